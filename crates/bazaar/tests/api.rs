use bazaar::api::ApiClient;
use tokio::runtime::Runtime;
use url::Url;

#[test]
fn authenticated_calls_require_a_token() {
    let rt = Runtime::new().expect("runtime");
    // No token attached: the call must fail before any network I/O.
    let client = ApiClient::new(Url::parse("http://localhost:9/api/v1/").expect("base url"));
    let err = rt.block_on(client.profile()).unwrap_err();
    assert!(err.to_string().contains("authentication token not found"));
}
