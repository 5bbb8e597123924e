#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod edit;
pub mod geom;
pub mod layout;

use std::fmt;

use edit::{EditOptions, EditSession};
use geom::{AnchorId, Point2};
use layout::{TextOnPathOptions, layout_along_path};
use serde::Serialize;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[derive(Debug, Serialize)]
struct AnchorExport {
    id: u32,
    x: f64,
    y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    handle: Option<u32>,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    session: EditSession,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            session: EditSession::default(),
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Vervangt de bewerkingsopties; bestaande punten blijven behouden.
    #[wasm_bindgen]
    pub fn set_edit_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: EditOptions = if options.is_undefined() || options.is_null() {
            EditOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        self.session.set_options(options);
        Ok(())
    }

    /// Voegt een ankerpunt toe; zonder index wordt achteraan toegevoegd.
    /// Een id die niet in `u32` past wordt geweigerd voordat het punt wordt ingevoegd.
    #[wasm_bindgen]
    pub fn add_point(&mut self, x: f64, y: f64, index: Option<u32>) -> Result<u32, JsValue> {
        let index = index.map(|i| i as usize);
        let exported = export_id(self.session.path().next_id().raw())?;
        self.session
            .add_point(Point2::new(x, y), index)
            .map_err(to_js_error)?;
        Ok(exported)
    }

    /// Verwijdert een ankerpunt. Onbekende punten geven `false`.
    #[wasm_bindgen]
    pub fn delete_point(&mut self, anchor: u32) -> Result<bool, JsValue> {
        self.session
            .delete_anchor(AnchorId::from_raw(u64::from(anchor)))
            .map_err(to_js_error)
    }

    /// Verwijdert een selectie van ankerpunten en geeft het aantal terug.
    #[wasm_bindgen]
    pub fn delete_points(&mut self, anchors: Vec<u32>) -> Result<u32, JsValue> {
        let ids: Vec<AnchorId> = anchors
            .into_iter()
            .map(|raw| AnchorId::from_raw(u64::from(raw)))
            .collect();
        let deleted = self.session.delete_anchors(&ids).map_err(to_js_error)?;
        u32::try_from(deleted).map_err(to_js_error)
    }

    /// Verplaatst een ankerpunt naar de positie van zijn handle.
    #[wasm_bindgen]
    pub fn move_point(&mut self, anchor: u32, x: f64, y: f64) -> Result<bool, JsValue> {
        self.session
            .drag_anchor(AnchorId::from_raw(u64::from(anchor)), Point2::new(x, y))
            .map_err(to_js_error)
    }

    /// Evalueert de muispositie; geeft een invoegkandidaat of `null`.
    #[wasm_bindgen]
    pub fn hover(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let candidate = self.session.hover(Point2::new(x, y));
        to_js(&candidate)
    }

    /// Voegt een punt in op de laatst gevonden kandidaat.
    #[wasm_bindgen]
    pub fn click(&mut self) -> Result<Option<u32>, JsValue> {
        self.session
            .insert_at_hover()
            .map(|id| export_id(id.raw()))
            .transpose()
    }

    #[wasm_bindgen]
    pub fn show(&mut self) {
        self.session.show();
    }

    #[wasm_bindgen]
    pub fn hide(&mut self) {
        self.session.hide();
    }

    #[wasm_bindgen]
    pub fn is_visible(&self) -> bool {
        self.session.is_visible()
    }

    /// Teller die bij elke wijziging oploopt; de host tekent opnieuw als die verandert.
    #[wasm_bindgen]
    pub fn revision(&self) -> u32 {
        u32::try_from(self.session.revision()).unwrap_or(u32::MAX)
    }

    /// Totale lengte van het pad.
    #[wasm_bindgen]
    pub fn length(&self) -> f64 {
        self.session.path().length()
    }

    /// SVG `d`-attribuut van het pad, of `undefined` bij minder dan twee punten.
    #[wasm_bindgen]
    pub fn get_path_d(&self) -> Option<String> {
        self.session.path().svg_path_data()
    }

    /// Tekencommando's van het pad (`move`/`cubic`), of `null`.
    #[wasm_bindgen]
    pub fn get_path(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.path().commands())
    }

    /// Ankerpunten met hun id en handle.
    #[wasm_bindgen]
    pub fn get_anchors(&self) -> Result<JsValue, JsValue> {
        let mut anchors = Vec::with_capacity(self.session.path().len());
        for anchor in self.session.path().anchors() {
            let handle = self
                .session
                .handle_of(anchor.id)
                .map(|h| export_id(h.raw()))
                .transpose()?;
            anchors.push(AnchorExport {
                id: export_id(anchor.id.raw())?,
                x: anchor.point.x,
                y: anchor.point.y,
                handle,
            });
        }
        to_js(&anchors)
    }

    /// Dichtstbijzijnde punt op het pad met het bijbehorende segment.
    #[wasm_bindgen]
    pub fn closest(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        if !x.is_finite() || !y.is_finite() {
            return Err(js_error("coördinaten moeten eindige getallen zijn"));
        }
        to_js(&self.session.path().closest(Point2::new(x, y)))
    }

    /// Positie, normaal en hoek op afstand `px` langs het pad.
    #[wasm_bindgen]
    pub fn locate(&self, px: f64) -> Result<JsValue, JsValue> {
        if !px.is_finite() {
            return Err(js_error("afstand moet een eindig getal zijn"));
        }
        to_js(&self.session.path().locate(px))
    }

    /// Plaatst glyphs met de gegeven breedtes langs het pad.
    #[wasm_bindgen]
    pub fn layout_text(&self, advances: Vec<f64>, options: JsValue) -> Result<JsValue, JsValue> {
        let options: TextOnPathOptions = if options.is_undefined() || options.is_null() {
            TextOnPathOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        let glyphs =
            layout_along_path(self.session.path(), &advances, &options).map_err(to_js_error)?;
        to_js(&glyphs)
    }

    #[wasm_bindgen]
    pub fn get_diagnostics(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.path().diagnostics())
    }
}

impl Engine {
    /// The editing session behind the facade, for native callers.
    #[must_use]
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }
}

fn export_id(raw: u64) -> Result<u32, JsValue> {
    u32::try_from(raw).map_err(to_js_error)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
