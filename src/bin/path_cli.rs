#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("path_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use curvetext_engine::edit::{EditOptions, EditSession};
    use curvetext_engine::geom::{BBox2, CubicBezier, PiecewisePath, Point2};
    use curvetext_engine::layout::{
        GlyphPlacement, TextOnPathOptions, layout_along_path, layout_evenly,
    };
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"path_cli (curvetext-engine)

USAGE:
  path_cli list
  path_cli run <scenario|all> [options]

SCENARIOS:
  straight_line
  wave_closest
  arch_text
  edit_session
  bezier_even

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.snap and/or <scenario>.svg to this dir (required for `all`)
  --snap <path>      Write snapshot (single scenario only)
  --svg <path>       Write SVG preview (single scenario only)
  --no-snap          Skip snapshot when using --out-dir
  --no-svg           Skip SVG when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut svg_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_snap = true;
        let mut write_svg = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--svg" => svg_path = Some(PathBuf::from(args.value("--svg")?)),
                "--overwrite" => overwrite = true,
                "--no-snap" => write_snap = false,
                "--no-svg" => write_svg = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if snap_path.is_some() || svg_path.is_some() {
                return Err("use either --out-dir or --snap/--svg (not both)".to_string());
            }
            if !write_snap && !write_svg {
                return Err("nothing to write (both --no-snap and --no-svg set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, write_snap, write_svg, overwrite)?;
                }
                return Ok(());
            }

            let scenario =
                Scenario::from_name(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, write_snap, write_svg, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_name(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", normalize_snapshot_text(&output.snapshot));
        }

        if let Some(path) = svg_path.as_deref() {
            write_text_file(path, &output.svg, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.summary);
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        dir: &Path,
        write_snap: bool,
        write_svg: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_svg {
            let path = dir.join(format!("{}.svg", output.name));
            write_text_file(&path, &output.svg, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.summary);
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    // ── snapshot formatting ─────────────────────────────────────────────────

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_point(out: &mut String, p: Point2) {
        write_f64(out, p.x);
        out.push(' ');
        write_f64(out, p.y);
    }

    fn write_path_section(out: &mut String, path: &PiecewisePath) {
        let diag = path.diagnostics();
        let _ = writeln!(out, "anchors {}", diag.anchor_count);
        for anchor in path.anchors() {
            out.push_str("a ");
            write_point(out, anchor.point);
            out.push('\n');
        }
        let _ = writeln!(out, "segments {}", diag.segment_count);
        for segment in path.segments() {
            out.push_str("s ");
            for (i, p) in segment.points().into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_point(out, p);
            }
            out.push_str(" len ");
            write_f64(out, segment.length());
            out.push('\n');
        }
        out.push_str("length ");
        write_f64(out, diag.total_length);
        out.push('\n');
        let _ = writeln!(out, "degenerate {}", diag.degenerate_segments);
    }

    fn write_glyphs(out: &mut String, glyphs: &[GlyphPlacement]) {
        let _ = writeln!(out, "glyphs {}", glyphs.len());
        for glyph in glyphs {
            let _ = write!(out, "g {} ", glyph.index);
            write_point(out, glyph.position);
            out.push_str(" deg ");
            write_f64(out, glyph.degrees());
            out.push_str(" at ");
            write_f64(out, glyph.offset);
            out.push('\n');
        }
    }

    // ── svg preview ─────────────────────────────────────────────────────────

    struct Svg {
        body: String,
    }

    impl Svg {
        fn new() -> Self {
            Self { body: String::new() }
        }

        fn path(&mut self, path: &PiecewisePath) {
            if let Some(d) = path.svg_path_data() {
                let _ = writeln!(
                    self.body,
                    r#"  <path d="{d}" fill="none" stroke="black" stroke-width="1.5"/>"#
                );
            }
            for anchor in path.anchors() {
                self.dot(anchor.point, 4.0, "rgba(0,0,0,0.25)");
            }
        }

        fn dot(&mut self, p: Point2, r: f64, fill: &str) {
            let _ = writeln!(
                self.body,
                r#"  <circle cx="{}" cy="{}" r="{r}" fill="{fill}"/>"#,
                p.x, p.y
            );
        }

        fn glyphs(&mut self, glyphs: &[GlyphPlacement], text: &[char]) {
            for (glyph, ch) in glyphs.iter().zip(text) {
                let _ = writeln!(
                    self.body,
                    r#"  <text x="{}" y="{}" transform="rotate({} {} {})" font-size="20">{}</text>"#,
                    glyph.position.x,
                    glyph.position.y,
                    glyph.degrees(),
                    glyph.position.x,
                    glyph.position.y,
                    ch
                );
            }
        }

        fn finish(self, bounds: Option<BBox2>) -> String {
            let (min, max) = bounds.map_or((Point2::ORIGIN, Point2::new(100.0, 100.0)), |b| {
                let b = b.expand_by(40.0);
                (b.min, b.max)
            });
            format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">\n{}</svg>\n",
                min.x,
                min.y,
                max.x - min.x,
                max.y - min.y,
                self.body
            )
        }
    }

    // ── scenarios ───────────────────────────────────────────────────────────

    struct ScenarioOutput {
        name: &'static str,
        snapshot: String,
        svg: String,
        summary: String,
    }

    #[derive(Debug, Clone, Copy)]
    enum Scenario {
        StraightLine,
        WaveClosest,
        ArchText,
        EditSession,
        BezierEven,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::StraightLine,
            Scenario::WaveClosest,
            Scenario::ArchText,
            Scenario::EditSession,
            Scenario::BezierEven,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::StraightLine => "straight_line",
                Scenario::WaveClosest => "wave_closest",
                Scenario::ArchText => "arch_text",
                Scenario::EditSession => "edit_session",
                Scenario::BezierEven => "bezier_even",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|s| s.name() == name)
        }
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        match scenario {
            Scenario::StraightLine => straight_line(),
            Scenario::WaveClosest => wave_closest(),
            Scenario::ArchText => arch_text(),
            Scenario::EditSession => edit_session(),
            Scenario::BezierEven => bezier_even(),
        }
    }

    fn header(name: &str) -> String {
        format!("# curvetext-engine path_cli\nscenario {name}\n")
    }

    fn straight_line() -> Result<ScenarioOutput, String> {
        let name = Scenario::StraightLine.name();
        let path = PiecewisePath::from_points([Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        let mut out = header(name);
        write_path_section(&mut out, &path);

        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let loc = path.locate_fraction(u).ok_or("path has no segments")?;
            out.push_str("at ");
            write_f64(&mut out, u);
            out.push_str(" -> ");
            write_point(&mut out, loc.position);
            out.push_str(" angle ");
            write_f64(&mut out, loc.angle);
            out.push('\n');
        }

        let hit = path.closest(Point2::new(50.0, 5.0)).ok_or("path has no segments")?;
        write_closest(&mut out, Point2::new(50.0, 5.0), hit.proj, hit.mdist, hit.curve_index);

        let mut svg = Svg::new();
        svg.path(&path);
        svg.dot(hit.proj, 2.0, "red");
        Ok(ScenarioOutput {
            name,
            summary: format!("length={:.3}", path.length()),
            snapshot: out,
            svg: svg.finish(path.bounding_box()),
        })
    }

    fn write_closest(out: &mut String, query: Point2, proj: Point2, mdist: f64, curve_index: usize) {
        out.push_str("closest ");
        write_point(out, query);
        out.push_str(" -> ");
        write_point(out, proj);
        out.push_str(" mdist ");
        write_f64(out, mdist);
        let _ = writeln!(out, " curve {curve_index}");
    }

    fn wave() -> PiecewisePath {
        PiecewisePath::from_points([
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 40.0),
            Point2::new(200.0, 100.0),
            Point2::new(300.0, 160.0),
            Point2::new(400.0, 100.0),
        ])
    }

    fn wave_closest() -> Result<ScenarioOutput, String> {
        let name = Scenario::WaveClosest.name();
        let path = wave();
        let mut out = header(name);
        write_path_section(&mut out, &path);

        let queries = [
            Point2::new(50.0, 50.0),
            Point2::new(200.0, 120.0),
            Point2::new(310.0, 190.0),
            Point2::new(-20.0, 100.0),
        ];
        let mut svg = Svg::new();
        svg.path(&path);
        for query in queries {
            let hit = path.closest(query).ok_or("path has no segments")?;
            write_closest(&mut out, query, hit.proj, hit.mdist, hit.curve_index);
            svg.dot(query, 2.0, "blue");
            svg.dot(hit.proj, 2.0, "red");
        }

        Ok(ScenarioOutput {
            name,
            summary: format!(
                "anchors={} segments={} length={:.3}",
                path.len(),
                path.segments().len(),
                path.length()
            ),
            snapshot: out,
            svg: svg.finish(path.bounding_box()),
        })
    }

    /// Rough advance widths for a sans face, in ems.
    fn advance_em(ch: char) -> f64 {
        match ch {
            ' ' => 0.28,
            'I' | 'i' | 'l' => 0.3,
            'M' | 'W' | 'm' | 'w' => 0.85,
            c if c.is_uppercase() => 0.68,
            _ => 0.55,
        }
    }

    fn arch_text() -> Result<ScenarioOutput, String> {
        let name = Scenario::ArchText.name();
        let path = PiecewisePath::from_points([
            Point2::new(40.0, 260.0),
            Point2::new(240.0, 80.0),
            Point2::new(440.0, 260.0),
        ]);
        let text: Vec<char> = "TEXT ON A CURVE".chars().collect();
        let options = TextOnPathOptions {
            font_size: 20.0,
            start_offset: 30.0,
            ..TextOnPathOptions::default()
        };
        let advances: Vec<f64> = text
            .iter()
            .map(|&c| advance_em(c) * options.font_size)
            .collect();
        let glyphs = layout_along_path(&path, &advances, &options).map_err(|e| e.to_string())?;

        let mut out = header(name);
        write_path_section(&mut out, &path);
        write_glyphs(&mut out, &glyphs);

        let mut svg = Svg::new();
        svg.path(&path);
        svg.glyphs(&glyphs, &text);
        Ok(ScenarioOutput {
            name,
            summary: format!("glyphs={} length={:.3}", glyphs.len(), path.length()),
            snapshot: out,
            svg: svg.finish(path.bounding_box()),
        })
    }

    fn edit_session() -> Result<ScenarioOutput, String> {
        let name = Scenario::EditSession.name();
        let mut session = EditSession::with_points(
            [Point2::new(0.0, 0.0), Point2::new(300.0, 0.0)],
            EditOptions::default(),
        )
        .map_err(|e| e.to_string())?;
        let mut out = header(name);

        let pointers = [
            Point2::new(150.0, 12.0),
            Point2::new(10.0, 5.0),
            Point2::new(75.0, 15.0),
        ];
        for pointer in pointers {
            out.push_str("hover ");
            write_point(&mut out, pointer);
            match session.hover(pointer) {
                Some(candidate) => {
                    out.push_str(" -> ");
                    write_point(&mut out, candidate.proj);
                    let _ = writeln!(out, " insert_at {}", candidate.insert_at);
                    session.insert_at_hover();
                }
                None => out.push_str(" -> none\n"),
            }
        }

        let middle = session.path().anchors()[1].id;
        session
            .drag_anchor(middle, Point2::new(150.0, -80.0))
            .map_err(|e| e.to_string())?;
        let first = session.path().anchors()[0].id;
        session.delete_anchor(first).map_err(|e| e.to_string())?;

        let _ = writeln!(out, "revision {}", session.revision());
        let _ = writeln!(out, "handles {}", session.handles().len());
        write_path_section(&mut out, session.path());
        if let Some(d) = session.path().svg_path_data() {
            let _ = writeln!(out, "d {d}");
        }

        let mut svg = Svg::new();
        svg.path(session.path());
        Ok(ScenarioOutput {
            name,
            summary: format!(
                "anchors={} revision={}",
                session.path().len(),
                session.revision()
            ),
            snapshot: out,
            svg: svg.finish(session.path().bounding_box()),
        })
    }

    fn bezier_even() -> Result<ScenarioOutput, String> {
        let name = Scenario::BezierEven.name();
        let curve = CubicBezier::new(
            Point2::new(20.0, 200.0),
            Point2::new(120.0, 20.0),
            Point2::new(280.0, 380.0),
            Point2::new(380.0, 200.0),
        );
        let text: Vec<char> = "EVENLY".chars().collect();
        let glyphs = layout_evenly(&curve, text.len());

        let mut out = header(name);
        out.push_str("length ");
        write_f64(&mut out, curve.length());
        out.push('\n');
        write_glyphs(&mut out, &glyphs);

        let [a, b, c, d] = curve.points();
        let mut svg = Svg::new();
        let _ = writeln!(
            svg.body,
            r#"  <path d="M {} {} C {} {} {} {} {} {}" fill="none" stroke="black"/>"#,
            a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y
        );
        svg.glyphs(&glyphs, &text);
        Ok(ScenarioOutput {
            name,
            summary: format!("glyphs={} length={:.3}", glyphs.len(), curve.length()),
            snapshot: out,
            svg: svg.finish(Some(curve.sampled_bounding_box())),
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
