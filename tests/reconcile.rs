use livedns_ddns::api::LiveDnsClient;
use livedns_ddns::config::RecordDefinition;
use livedns_ddns::reconcile::{self, Outcome};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IP: &str = "203.0.113.7";

fn record(server: &MockServer, section: &str, name: &str, ttl: u32) -> RecordDefinition {
    RecordDefinition {
        section: section.to_owned(),
        api_base_url: format!("{}/", server.uri()),
        api_key: "s3cret".to_owned(),
        domain: "example.com".to_owned(),
        record_name: name.to_owned(),
        record_type: "A".to_owned(),
        ttl,
    }
}

fn rrset_body(value: &str, ttl: u32) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "rrset_values": [value], "rrset_ttl": ttl }))
}

#[tokio::test]
async fn matching_record_issues_no_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/www/A"))
        .and(header("X-Api-Key", "s3cret"))
        .respond_with(rrset_body(IP, 300))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;
    Mock::given(method("PUT")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "web", "www", 300)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Unchanged]);
}

#[tokio::test]
async fn missing_record_is_created() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/mx1/A"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domains/example.com/records/mx1/A"))
        .and(header("X-Api-Key", "s3cret"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "rrset_ttl": 600, "rrset_values": [IP] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "mail", "mx1", 600)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Created]);
}

#[tokio::test]
async fn stale_record_is_updated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/www/A"))
        .respond_with(rrset_body("198.51.100.1", 300))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/domains/example.com/records/www/A"))
        .and(body_json(json!({ "rrset_ttl": 300, "rrset_values": [IP] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "web", "www", 300)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Updated]);
}

#[tokio::test]
async fn failed_write_does_not_stop_the_run() {
    let server = MockServer::start().await;

    // First record: update rejected with a non-201 status.
    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/www/A"))
        .respond_with(rrset_body("198.51.100.1", 300))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/domains/example.com/records/www/A"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    // Second record still gets processed.
    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/mx1/A"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domains/example.com/records/mx1/A"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "web", "www", 300), record(&server, "mail", "mx1", 600)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Failed, Outcome::Created]);
}

#[tokio::test]
async fn fetch_error_skips_the_record_without_writing() {
    let server = MockServer::start().await;

    // A 500 on the state check is not "absent"; no create may be attempted.
    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/www/A"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;
    Mock::given(method("PUT")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "web", "www", 300)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Failed]);
}

// The two-section scenario: `web` already points at the resolved address while `mail` does not
// exist yet, so one run leaves `web` alone and creates `mail` with its own TTL.
#[tokio::test]
async fn mixed_noop_and_create_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/www/A"))
        .respond_with(rrset_body(IP, 300))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains/example.com/records/mx1/A"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/domains/example.com/records/mx1/A"))
        .and(body_json(json!({ "rrset_ttl": 600, "rrset_values": [IP] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let client = LiveDnsClient::new().unwrap();
    let records = [record(&server, "web", "www", 300), record(&server, "mail", "mx1", 600)];
    let outcomes = reconcile::reconcile(&client, IP, &records).await;
    assert_eq!(outcomes, vec![Outcome::Unchanged, Outcome::Created]);
}
