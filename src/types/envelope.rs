use serde::{Deserialize, Serialize};

/// JSON body of every `/api` response.
///
/// `success` is always present; the other fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            count: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            count: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    pub fn listing(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }
}

impl ApiEnvelope<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_carries_count_even_when_empty() {
        let env = ApiEnvelope::<Vec<u8>>::listing(Vec::new());
        assert_eq!(
            serde_json::to_value(&env).expect("serialize"),
            json!({"success": true, "data": [], "count": 0})
        );
    }

    #[test]
    fn failure_omits_unset_fields() {
        let env = ApiEnvelope::<()>::failure("Bank not found");
        assert_eq!(
            serde_json::to_value(&env).expect("serialize"),
            json!({"success": false, "error": "Bank not found"})
        );
    }

    #[test]
    fn message_only_has_no_data() {
        let env = ApiEnvelope::message_only("Bank deleted successfully");
        assert_eq!(
            serde_json::to_value(&env).expect("serialize"),
            json!({"success": true, "message": "Bank deleted successfully"})
        );
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        id: i64,
    }

    #[test]
    fn decodes_without_data_for_types_lacking_default() {
        let env: ApiEnvelope<Row> =
            serde_json::from_str(r#"{"success": false, "error": "Bank not found"}"#)
                .expect("deserialize");
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("Bank not found"));

        let env: ApiEnvelope<Row> =
            serde_json::from_str(r#"{"success": true, "data": {"id": 4}}"#).expect("deserialize");
        assert_eq!(env.data.map(|row| row.id), Some(4));
    }
}
