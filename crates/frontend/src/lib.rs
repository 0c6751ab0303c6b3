pub mod domain;
pub mod shared;

use contracts::domain::a001_putaway::PutAway;
use domain::a001_putaway::ui::check::{
    default_pivot_by, ExpandedState, PutAwayCheckPage, ResumeParams,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// `undefined`/`null` fall back to `default`
fn from_js_or<T: DeserializeOwned>(value: JsValue, what: &str, default: T) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(default)
    } else {
        from_js(value, what)
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Mounts the put-away check page into `<body>`.
///
/// `first_page()` is called to go back to the put-away list, `prev_page(params)` to return to
/// the previous step with `{ putAway, pivotBy, expanded }`.
#[wasm_bindgen]
pub fn mount_put_away_check(
    put_away: JsValue,
    location_id: String,
    pivot_by: JsValue,
    expanded: JsValue,
    first_page: js_sys::Function,
    prev_page: js_sys::Function,
) -> Result<(), JsValue> {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    let put_away: PutAway = from_js(put_away, "put-away")?;
    let pivot_by: Vec<String> = from_js_or(pivot_by, "pivotBy", default_pivot_by())?;
    let expanded: ExpandedState = from_js_or(expanded, "expanded", ExpandedState::new())?;

    log::info!(
        "mounting put-away check for {} at location {}",
        put_away.putaway_number,
        location_id
    );

    leptos::mount::mount_to_body(move || {
        let first_page = StoredValue::new_local(first_page);
        let prev_page = StoredValue::new_local(prev_page);

        let on_first_page = Callback::new(move |_: ()| {
            first_page.with_value(|f| {
                if let Err(e) = f.call0(&JsValue::NULL) {
                    log::error!("firstPage callback failed: {:?}", e);
                }
            })
        });
        let on_prev_page = Callback::new(move |params: ResumeParams| {
            let arg = match to_js(&params) {
                Ok(arg) => arg,
                Err(e) => {
                    log::error!("failed to serialize resume params: {:?}", e);
                    return;
                }
            };
            prev_page.with_value(|f| {
                if let Err(e) = f.call1(&JsValue::NULL, &arg) {
                    log::error!("prevPage callback failed: {:?}", e);
                }
            })
        });

        view! {
            <PutAwayCheckPage
                put_away=put_away
                location_id=location_id
                pivot_by=pivot_by
                expanded=expanded
                on_first_page=on_first_page
                on_prev_page=on_prev_page
            />
        }
    });

    Ok(())
}
