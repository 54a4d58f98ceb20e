/* 📖 # PAL behaviour shared by both implementations

The same scenarios run against `MockPal` and `RealPal` so that code tested
against the mock behaves the same once it talks to a real socket.
*/

#[cfg(test)]
mod pal_trait_tests {
    use crate::pal::http::{
        HttpRequest, HttpResponse, HttpServerConfig, HttpService, HttpStatusCode,
    };
    use crate::{LookupResult, MockPal, PalHandle, RealPal};

    #[derive(Debug)]
    struct StatusService;

    impl HttpService for StatusService {
        fn handle_request(&self, request: HttpRequest) -> LookupResult<HttpResponse> {
            let code = request
                .path()
                .trim_start_matches("/status/")
                .parse::<u16>()
                .map_err(|e| crate::err!("not a status code: {}", e))?;
            Ok(HttpResponse::new(code).with_body(format!("status {}", code)))
        }
    }

    fn assert_status_round_trip(pal: &PalHandle) {
        let handle = pal
            .start_http_server(Box::new(StatusService), HttpServerConfig::new("127.0.0.1"))
            .unwrap();
        let base_url = handle.base_url("127.0.0.1");

        for code in [200u16, 400, 404, 418, 503] {
            let response = pal
                .send_http_request(HttpRequest::get(format!("{}/status/{}", base_url, code)))
                .unwrap();
            assert_eq!(response.status().as_u16(), code);
            assert_eq!(response.body().as_string(), Some(format!("status {}", code)));
        }

        let response = pal
            .send_http_request(HttpRequest::get(format!("{}/status/teapot", base_url)))
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::SERVICE_ERROR);
    }

    #[test]
    fn test_pal_handle_deref() {
        let mock = MockPal::new();
        mock.set_env_var("THING_HOST", "things.local");

        let handle = PalHandle::new(mock);
        let clone = handle.clone();
        assert_eq!(clone.env_var("THING_HOST"), Some("things.local".to_string()));
    }

    #[test]
    fn test_status_round_trip_mock() {
        assert_status_round_trip(&PalHandle::new(MockPal::new()));
    }

    #[test]
    fn test_status_round_trip_real() {
        assert_status_round_trip(&PalHandle::new(RealPal::new()));
    }
}
