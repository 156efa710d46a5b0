//! Document types for the `Tasks` and `Users` collections.
//!
//! The store is schema-free: beyond the identifier (and the user's `email`
//! uniqueness key) every field a client sends is carried verbatim through a
//! flattened map, so unknown fields survive a round trip untouched.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Serialize a store-assigned id as its plain hex form.
///
/// `ObjectId`'s own `Serialize` emits the extended-JSON `{"$oid": ..}` map;
/// clients expect `"_id": "<hex>"`. Only ever called with `Some` because the
/// field is skipped when unset.
fn oid_as_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// A task record.
///
/// No fixed schema: the identifier is assigned by the store on insert and
/// everything else lives in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A user record.
///
/// `email` is the application-level uniqueness key checked before insert;
/// the rest of the record is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "oid_as_hex",
        default
    )]
    pub id: Option<ObjectId>,

    pub email: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Wire shape of a partial task update: the named fields overwrite their
/// stored counterparts, all others are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub id: String,
    #[serde(rename = "updatedData")]
    pub updated_data: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_keeps_arbitrary_fields() {
        let task: TaskDocument =
            serde_json::from_value(json!({"title": "Buy milk", "priority": 3})).unwrap();
        assert!(task.id.is_none());
        assert_eq!(task.fields["title"], json!("Buy milk"));
        assert_eq!(task.fields["priority"], json!(3));
    }

    #[test]
    fn test_unassigned_id_is_not_serialized() {
        let task: TaskDocument = serde_json::from_value(json!({"title": "t"})).unwrap();
        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out, json!({"title": "t"}));
    }

    #[test]
    fn test_assigned_id_serializes_as_hex() {
        let oid = ObjectId::new();
        let mut task: TaskDocument = serde_json::from_value(json!({"title": "t"})).unwrap();
        task.id = Some(oid);
        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["_id"], json!(oid.to_hex()));
    }

    #[test]
    fn test_user_requires_email() {
        let missing = serde_json::from_value::<UserDocument>(json!({"name": "Salman"}));
        assert!(missing.is_err());

        let user: UserDocument =
            serde_json::from_value(json!({"email": "a@b.io", "name": "Salman"})).unwrap();
        assert_eq!(user.email, "a@b.io");
        assert_eq!(user.fields["name"], json!("Salman"));
    }

    #[test]
    fn test_patch_wire_shape() {
        let patch: TaskPatch =
            serde_json::from_value(json!({"id": "abc", "updatedData": {"status": "done"}}))
                .unwrap();
        assert_eq!(patch.id, "abc");
        assert_eq!(patch.updated_data["status"], json!("done"));

        let out = serde_json::to_value(&patch).unwrap();
        assert_eq!(out, json!({"id": "abc", "updatedData": {"status": "done"}}));
    }
}
