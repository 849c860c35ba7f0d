use crate::models::ErrorResponse;
use crate::AppState;
use log::error;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde_json::Value;

#[get("/get_data?<channel_id>")]
pub async fn get_data(
    channel_id: Option<String>,
    state: &State<AppState>,
) -> Result<Json<Value>, ErrorResponse> {
    // Validation happens before any store access; an empty value is as
    // invalid as a missing one.
    let channel_id = match channel_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ErrorResponse::bad_request("channel_id parameter is required")),
    };

    match state.store.find_channel(&channel_id).await {
        Ok(Some(document)) => Ok(Json(document)),
        Ok(None) => Err(ErrorResponse::not_found(format!(
            "no stored document for channel_id {channel_id}"
        ))),
        Err(e) => {
            error!("Document lookup failed for channel {channel_id}: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::ChannelStore;
    use rocket::http::Status;
    use rocket::local::blocking::Client;
    use rocket::routes;
    use serde_json::json;

    struct StubStore {
        document: Option<Value>,
    }

    #[rocket::async_trait]
    impl ChannelStore for StubStore {
        async fn find_channel(&self, _channel_id: &str) -> anyhow::Result<Option<Value>> {
            Ok(self.document.clone())
        }
    }

    struct UnreachableStore;

    #[rocket::async_trait]
    impl ChannelStore for UnreachableStore {
        async fn find_channel(&self, _channel_id: &str) -> anyhow::Result<Option<Value>> {
            panic!("store must not be queried");
        }
    }

    fn client_with(store: Box<dyn ChannelStore>) -> Client {
        let rocket = rocket::build()
            .manage(AppState { store })
            .mount("/", routes![get_data]);
        Client::tracked(rocket).expect("valid rocket instance")
    }

    #[test]
    fn missing_channel_id_is_rejected_before_store_lookup() {
        let client = client_with(Box::new(UnreachableStore));
        let response = client.get("/get_data").dispatch();

        assert_eq!(response.status(), Status::BadRequest);
        let body = response.into_string().unwrap();
        assert!(body.contains("channel_id parameter is required"));
    }

    #[test]
    fn empty_channel_id_is_rejected_before_store_lookup() {
        let client = client_with(Box::new(UnreachableStore));
        let response = client.get("/get_data?channel_id=").dispatch();

        assert_eq!(response.status(), Status::BadRequest);
        let body = response.into_string().unwrap();
        assert!(body.contains("channel_id parameter is required"));
    }

    #[test]
    fn stored_document_is_returned_verbatim() {
        let document = json!({ "channel_id": "UC1", "total_views": 42 });
        let client = client_with(Box::new(StubStore {
            document: Some(document.clone()),
        }));

        let response = client.get("/get_data?channel_id=UC1").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body, document);
    }

    #[test]
    fn unknown_channel_is_a_404() {
        let client = client_with(Box::new(StubStore { document: None }));
        let response = client.get("/get_data?channel_id=UCmissing").dispatch();
        assert_eq!(response.status(), Status::NotFound);
    }
}
