use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage {
    Hello { msg: String },
    Init { units: Vec<Position> },
    MoveUnit { unit_id: u32, x: f32, y: f32, z: f32 },
}

impl GameMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_wire_shape() {
        let msg = GameMessage::Init { units: vec![Position { x: 1.0, y: 2.0, z: 3.0 }] };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "init", "units": [{ "x": 1.0, "y": 2.0, "z": 3.0 }] }));
    }

    #[test]
    fn decodes_client_frames() {
        let hello: GameMessage = serde_json::from_str(r#"{"type":"hello","msg":"Hello server!"}"#).unwrap();
        assert_eq!(hello, GameMessage::Hello { msg: "Hello server!".into() });

        let mv: GameMessage = serde_json::from_str(r#"{"type":"move_unit","unit_id":3,"x":1,"y":0,"z":-2}"#).unwrap();
        assert_eq!(mv, GameMessage::MoveUnit { unit_id: 3, x: 1.0, y: 0.0, z: -2.0 });
    }
}
