use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::messages)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl NewMessage {
    pub fn new(sender_id: &str, receiver_id: &str, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_owned(),
            receiver_id: receiver_id.to_owned(),
            content,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
}
