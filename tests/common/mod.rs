#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use kitchen_planner::api_connection::{ApiConnectionError, GenerationRequest, TextGenerator};

pub enum Reply {
    Text(String),
    Fail(ApiConnectionError),
    /// Waits for `release` before answering with the text.
    Gated(Arc<Notify>, String),
}

/// Backend that answers from a queue of canned replies and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ApiConnectionError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("backend called more times than scripted");
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(err) => Err(err),
            Reply::Gated(gate, text) => {
                gate.notified().await;
                Ok(text)
            }
        }
    }
}

pub fn ok(value: Value) -> Reply {
    Reply::Text(value.to_string())
}

pub fn transport_failure() -> Reply {
    Reply::Fail(ApiConnectionError::ApiError {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        error_body: "upstream unavailable".to_string(),
    })
}

pub fn dish(name: &str, ingredients: &[&str]) -> Value {
    json!({
        "name": name,
        "description": format!("Traditional {name}"),
        "ingredients": ingredients,
        "instructions": ["Prepare the ingredients", format!("Serve the {name}")]
    })
}

pub fn japan_plan() -> Value {
    json!({
        "country": "Japan",
        "appetizer": dish("Edamame", &["edamame pods", "sea salt"]),
        "sideDish": dish("Miso Soup", &["white miso", "tofu", "scallions"]),
        "mainCourse": dish("Chicken Katsu", &["chicken thighs", "panko", "egg"]),
        "drink": dish("Umeshu", &["ume plums", "shochu", "rock sugar"]),
        "shoppingList": [
            {"category": "Produce", "items": ["scallions", "edamame pods"]},
            {"category": "Meat/Protein", "items": ["chicken thighs", "tofu", "egg"]},
            {"category": "Pantry", "items": ["white miso", "panko", "shochu", "ume plums", "rock sugar", "sea salt"]}
        ]
    })
}

pub fn japan_shopping_list_after_drink_swap() -> Value {
    json!([
        {"category": "Produce", "items": ["scallions", "edamame pods", "yuzu"]},
        {"category": "Meat/Protein", "items": ["chicken thighs", "tofu", "egg"]},
        {"category": "Pantry", "items": ["white miso", "panko", "sea salt", "honey"]}
    ])
}
