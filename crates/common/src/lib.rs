pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use crate::types::{ApiResponse, Meta};

    #[test]
    fn health_type_ok() {
        let h = crate::types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::ok("created", serde_json::json!({"id": 1}));
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["message"], "created");
        assert_eq!(v["data"]["id"], 1);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn error_envelope_shape() {
        let resp = ApiResponse::<()>::err("nope", "NOT_FOUND", None);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "NOT_FOUND");
        assert!(v.get("data").is_none());
    }

    #[test]
    fn meta_serializes_pagination_fields() {
        let resp = ApiResponse::ok_paged("listed", vec![1, 2], Meta { page: 2, per_page: 20, total: 57 });
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["meta"]["page"], 2);
        assert_eq!(v["meta"]["total"], 57);
    }
}
