//! Persistence client for the document store.
//!
//! One shared MongoDB client is opened at process start and handed to every
//! handler through `AppState`. Operations are thin typed accessors over the
//! `Tasks` and `Users` collections; no retry or pooling beyond the driver's
//! defaults.

use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::model::{TaskDocument, UserDocument};

const TASKS_COLLECTION: &str = "Tasks";
const USERS_COLLECTION: &str = "Users";

/// Parse a client-supplied identifier into an `ObjectId`.
///
/// Malformed ids are a caller error, not a database error.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| SyncError::invalid_id(id))
}

/// Handle to the two record collections.
///
/// Clone cheaply — collection handles share the underlying client.
#[derive(Clone)]
pub struct Store {
    tasks: Collection<TaskDocument>,
    users: Collection<UserDocument>,
}

impl Store {
    /// Connect to the deployment, pin the stable server API, and verify
    /// reachability with a ping. A failure here is fatal to the caller:
    /// there is no degraded mode where the server listens without a
    /// functioning backing store.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

        let client = Client::with_options(options)?;
        let db = client.database(&config.db_name);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(db = %config.db_name, "connected to MongoDB");

        Ok(Self {
            tasks: db.collection(TASKS_COLLECTION),
            users: db.collection(USERS_COLLECTION),
        })
    }

    /// All task records.
    pub async fn list_tasks(&self) -> Result<Vec<TaskDocument>> {
        Ok(self.tasks.find(doc! {}).await?.try_collect().await?)
    }

    /// Insert a task and return it with the store-assigned id.
    pub async fn insert_task(&self, mut task: TaskDocument) -> Result<TaskDocument> {
        let result = self.tasks.insert_one(&task).await?;
        task.id = result.inserted_id.as_object_id();
        Ok(task)
    }

    /// Overwrite only the named fields of a task, leaving the rest intact.
    pub async fn update_task(&self, id: &str, updated_data: &Map<String, Value>) -> Result<()> {
        let oid = parse_object_id(id)?;
        let set = to_document(updated_data)?;
        self.tasks
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await?;
        Ok(())
    }

    /// Delete a task by id. Deleting an id that no longer exists is not an
    /// error.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let oid = parse_object_id(id)?;
        self.tasks.delete_one(doc! { "_id": oid }).await?;
        Ok(())
    }

    /// All user records.
    pub async fn list_users(&self) -> Result<Vec<UserDocument>> {
        Ok(self.users.find(doc! {}).await?.try_collect().await?)
    }

    /// Look up a user by the application-level uniqueness key.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    /// Insert a user and return it with the store-assigned id. Callers
    /// check `find_user_by_email` first; the store itself enforces nothing.
    pub async fn insert_user(&self, mut user: UserDocument) -> Result<UserDocument> {
        let result = self.users.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_object_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn test_parse_malformed_object_id() {
        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(matches!(err, SyncError::InvalidId(_)));
        assert!(err.to_string().contains("not-an-id"));
    }
}
