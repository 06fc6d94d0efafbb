//! Drag-and-drop payloads
//!
//! Picking an item up produces a small JSON envelope naming where it came
//! from. Dropping it parses the envelope back and dispatches the matching
//! store action.

use serde::{Deserialize, Serialize};

use crate::items::EquipSlot;

/// Where a carried item was picked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DragPayload {
    #[serde(rename_all = "camelCase")]
    Stash {
        tab_id: String,
        index: usize,
        item_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Equipment {
        slot_id: EquipSlot,
        item_type: String,
    },
}

impl DragPayload {
    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn item_type(&self) -> &str {
        match self {
            DragPayload::Stash { item_type, .. } | DragPayload::Equipment { item_type, .. } => item_type,
        }
    }

    /// Short description for the status line
    pub fn describe(&self) -> String {
        match self {
            DragPayload::Stash { tab_id, index, item_type } => {
                format!("{} from {} cell {}", item_type, tab_id, index)
            }
            DragPayload::Equipment { slot_id, item_type } => {
                format!("{} from {}", item_type, slot_id.name())
            }
        }
    }
}

/// Parse a drop payload, logging and returning `None` when malformed
pub fn parse_drag_payload(raw: &str) -> Option<DragPayload> {
    match serde_json::from_str(raw) {
        Ok(payload) => Some(payload),
        Err(e) => {
            log::warn!("Ignoring malformed drag payload {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stash_payload_shape() {
        let payload = DragPayload::Stash {
            tab_id: "tab-1".into(),
            index: 4,
            item_type: "ring".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(value["type"], "stash");
        assert_eq!(value["tabId"], "tab-1");
        assert_eq!(value["index"], 4);
        assert_eq!(value["itemType"], "ring");
    }

    #[test]
    fn test_parse_equipment_payload() {
        let raw = r#"{"type":"equipment","slotId":"offHand","itemType":"shield"}"#;
        assert_eq!(
            parse_drag_payload(raw),
            Some(DragPayload::Equipment {
                slot_id: EquipSlot::OffHand,
                item_type: "shield".into(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_drag_payload(""), None);
        assert_eq!(parse_drag_payload("{\"type\":\"bench\"}"), None);
        assert_eq!(parse_drag_payload(r#"{"type":"stash","tabId":"tab-1"}"#), None);
        assert_eq!(parse_drag_payload(r#"{"type":"equipment","slotId":"tail","itemType":"x"}"#), None);
    }
}
