//! XML API envelope classification against captured responses.

mod common;

use common::fixtures::load_response;
use vsys_import_verifier::client::xml_api::classify_response;
use vsys_import_verifier::{NodeContents, QueryError, RelationKind};

const XPATH: &str = "/config/devices/entry[@name='localhost.localdomain']/template/entry[@name='tmplA']/config/devices/entry[@name='localhost.localdomain']/vsys/entry[@name='vsys1']/import/network/interface";

#[test]
fn test_success_response_decodes() {
    let body = classify_response(XPATH, load_response("interface_import")).unwrap();
    let list = RelationKind::Interface.decode(&body).unwrap();
    assert!(list.contains("ethernet1/3"));
}

#[test]
fn test_empty_success_response_is_a_payload() {
    let body = classify_response(XPATH, load_response("empty_result")).unwrap();
    match NodeContents::classify(Ok(body)).unwrap() {
        NodeContents::Payload(payload) => {
            assert!(RelationKind::Interface.decode(&payload).unwrap().is_empty())
        }
        NodeContents::Empty => panic!("a success envelope is never blank"),
    }
}

#[test]
fn test_not_found_response_is_empty_node() {
    let result = classify_response(XPATH, load_response("not_found"));
    assert_eq!(result, Err(QueryError::not_found(XPATH)));
    assert_eq!(NodeContents::classify(result).unwrap(), NodeContents::Empty);
}

#[test]
fn test_invalid_credential_is_hard_failure() {
    let result = classify_response(XPATH, load_response("invalid_credential"));
    assert_eq!(
        result,
        Err(QueryError::Api {
            code: Some(403),
            message: "Invalid Credential".to_string()
        })
    );
    assert!(NodeContents::classify(result).is_err());
}
