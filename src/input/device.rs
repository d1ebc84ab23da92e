//! Raw pointer events and input device classification.

use serde::{Deserialize, Serialize};

/// Kind of device a pointer event came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Platform hint for touch contacts, when available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchType {
    Direct,
    Stylus,
}

/// A pointer event in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i64,
    pub kind: PointerKind,
    pub client_x: f32,
    pub client_y: f32,
    /// Reported pressure, if the device reports one
    pub pressure: Option<f32>,
    pub touch_type: Option<TouchType>,
}

impl PointerEvent {
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            client_x,
            client_y,
            pressure: None,
            touch_type: None,
        }
    }

    pub fn pen(pointer_id: i64, client_x: f32, client_y: f32, pressure: f32) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Pen,
            client_x,
            client_y,
            pressure: Some(pressure),
            touch_type: None,
        }
    }

    pub fn touch(pointer_id: i64, client_x: f32, client_y: f32) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            client_x,
            client_y,
            pressure: None,
            touch_type: Some(TouchType::Direct),
        }
    }

    pub fn with_pressure(mut self, pressure: Option<f32>) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_touch_type(mut self, touch_type: TouchType) -> Self {
        self.touch_type = Some(touch_type);
        self
    }

    /// Same event moved to another position.
    pub fn moved_to(mut self, client_x: f32, client_y: f32) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }
}

/// Coarse device class reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Pen,
    Touch,
}

/// What the session learned about the device when a stroke started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceReading {
    pub class: DeviceClass,
    /// Raw reported pressure, before defaulting and clamping
    pub force: Option<f32>,
}

/// Pens and stylus touches are `Pen`; fingers and mice count as `Touch`.
pub fn classify(event: &PointerEvent) -> DeviceReading {
    let class = match (event.kind, event.touch_type) {
        (PointerKind::Pen, _) | (PointerKind::Touch, Some(TouchType::Stylus)) => DeviceClass::Pen,
        _ => DeviceClass::Touch,
    };
    DeviceReading {
        class,
        force: event.pressure,
    }
}
