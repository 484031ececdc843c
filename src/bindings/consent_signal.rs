use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::js_message;
use crate::services::consent::{ConsentSignalSink, ConsentSignals, Grant};

/// Pushes consent signals to Google's tag (`gtag`) and `dataLayer`, when
/// the page has loaded them
#[derive(Debug, Clone, Copy, Default)]
pub struct GtagSignal;

/// Event pushed onto `dataLayer`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataLayerEvent {
    pub event: &'static str,
    pub ad_storage: Grant,
    pub ad_user_data: Grant,
    pub ad_personalization: Grant,
    pub analytics_storage: Grant,
}

impl From<&ConsentSignals> for DataLayerEvent {
    fn from(signals: &ConsentSignals) -> Self {
        Self {
            event: "consent_update",
            ad_storage: signals.ad_storage,
            ad_user_data: signals.ad_user_data,
            ad_personalization: signals.ad_personalization,
            analytics_storage: signals.analytics_storage,
        }
    }
}

impl GtagSignal {
    fn call_gtag(window: &JsValue, signals: &ConsentSignals) -> Result<(), JsValue> {
        let Ok(gtag) = Reflect::get(window, &JsValue::from_str("gtag"))?.dyn_into::<Function>() else {
            return Ok(());
        };
        let payload = serde_wasm_bindgen::to_value(signals)?;
        gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("consent"),
            &JsValue::from_str("update"),
            &payload,
        )?;
        Ok(())
    }

    fn push_data_layer(window: &JsValue, signals: &ConsentSignals) -> Result<(), JsValue> {
        let data_layer = Reflect::get(window, &JsValue::from_str("dataLayer"))?;
        if !Array::is_array(&data_layer) {
            return Ok(());
        }
        let event = serde_wasm_bindgen::to_value(&DataLayerEvent::from(signals))?;
        data_layer.unchecked_into::<Array>().push(&event);
        Ok(())
    }
}

impl ConsentSignalSink for GtagSignal {
    fn notify(&self, signals: &ConsentSignals) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let window: JsValue = window.into();

        if let Err(e) = Self::call_gtag(&window, signals) {
            tracing::warn!(error = %js_message(&e), "gtag consent update failed");
        }
        if let Err(e) = Self::push_data_layer(&window, signals) {
            tracing::warn!(error = %js_message(&e), "dataLayer push failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::consent::ConsentChoice;

    #[test]
    fn test_data_layer_event_shape() {
        let signals = ConsentSignals::from_choice(ConsentChoice { ads: true, analytics: false });
        let json = serde_json::to_value(DataLayerEvent::from(&signals)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "consent_update",
                "ad_storage": "granted",
                "ad_user_data": "granted",
                "ad_personalization": "granted",
                "analytics_storage": "denied",
            })
        );
    }
}
