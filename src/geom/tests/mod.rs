mod test_curve_basic;
mod test_path_basic;
