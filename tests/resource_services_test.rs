mod common;

use anyhow::Result;
use dern_support::app::{
    AppointmentService, QuoteService, SparePartService, SupportRequestService,
};
use dern_support::SupportError;
use httpmock::prelude::*;
use serde_json::json;

fn support_requests() -> serde_json::Value {
    json!([
        { "supportRequestId": 1, "issueType": "Hardware", "description": "No boot",
          "requestDate": "2024-10-01T09:00:00Z", "userId": "cust-1" },
        { "supportRequestId": 2, "issueType": "Software", "description": "Virus",
          "requestDate": "2024-10-02T09:00:00Z", "userId": "cust-2" },
        { "supportRequestId": 3, "issueType": "Hardware", "description": "Fan noise",
          "requestDate": "2024-10-03T09:00:00Z", "userId": "cust-1" }
    ])
}

fn spare_parts() -> serde_json::Value {
    json!([
        { "sparePartId": 1, "name": "CPU", "stockLevel": 5, "cost": 100.0 },
        { "sparePartId": 2, "name": "Cooling Fan", "stockLevel": 2, "cost": 12.5 }
    ])
}

fn quotes() -> serde_json::Value {
    json!([
        { "quoteId": 10, "supportRequestId": 1, "sparePartIds": [2], "description": "Fan", "totalCost": 12.5 },
        { "quoteId": 11, "supportRequestId": 2, "sparePartIds": [], "description": "Labour", "totalCost": 50.0 }
    ])
}

#[tokio::test]
async fn test_customer_sees_only_own_support_requests() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SupportRequest");
            then.status(200).json_body(support_requests());
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let rows = SupportRequestService::new(&client).list().await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.support_request_id).collect();
    assert_eq!(ids, vec![1, 3]);

    let (tech, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    assert_eq!(SupportRequestService::new(&tech).list().await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_quote_overview_filters_for_customer() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SupportRequest");
            then.status(200).json_body(support_requests());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SparePart");
            then.status(200).json_body(spare_parts());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/Quote");
            then.status(200).json_body(quotes());
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let overview = QuoteService::new(&client).overview().await?;

    assert_eq!(overview.support_requests.len(), 2);
    assert_eq!(overview.spare_parts.len(), 2);
    assert_eq!(overview.quotes.len(), 1);
    assert_eq!(overview.quotes[0].quote_id, 10);
    Ok(())
}

/// 建立報價：總價為所選零件成本加總，並逐一扣減庫存
#[tokio::test]
async fn test_create_quote_prices_parts_and_decrements_stock() -> Result<()> {
    let server = MockServer::start_async().await;
    let parts_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/SparePart");
            then.status(200).json_body(spare_parts());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SupportRequest");
            then.status(200).json_body(support_requests());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/Quote");
            then.status(200).json_body(quotes());
        })
        .await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/Quote").json_body(json!({
                "supportRequestId": 3,
                "sparePartIds": [1, 2],
                "description": "CPU and fan swap",
                "totalCost": 112.5
            }));
            then.status(201);
        })
        .await;
    let cpu_stock_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/SparePart/1").json_body(json!({
                "sparePartId": 1, "name": "CPU", "stockLevel": 4, "cost": 100.0
            }));
            then.status(204);
        })
        .await;
    let fan_stock_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/SparePart/2").json_body(json!({
                "sparePartId": 2, "name": "Cooling Fan", "stockLevel": 1, "cost": 12.5
            }));
            then.status(204);
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    let overview = QuoteService::new(&client)
        .create(3, &[1, 2, 1], "CPU and fan swap")
        .await?;

    create_mock.assert_async().await;
    cpu_stock_mock.assert_async().await;
    fan_stock_mock.assert_async().await;
    // one lookup for pricing, one for the refreshed overview
    parts_mock.assert_hits_async(2).await;
    assert_eq!(overview.quotes.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_stock_update_does_not_fail_quote() -> Result<()> {
    let server = MockServer::start_async().await;
    for (path, body) in [
        ("/SparePart", spare_parts()),
        ("/SupportRequest", support_requests()),
        ("/Quote", quotes()),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200).json_body(body);
            })
            .await;
    }
    server
        .mock_async(|when, then| {
            when.method(POST).path("/Quote");
            then.status(201);
        })
        .await;
    let stock_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/SparePart/1");
            then.status(500).body("stock service down");
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Admin", "admin-1");
    let result = QuoteService::new(&client).create(1, &[1], "").await;

    assert!(result.is_ok());
    stock_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_update_quote_does_not_touch_stock() -> Result<()> {
    let server = MockServer::start_async().await;
    for (path, body) in [
        ("/SparePart", spare_parts()),
        ("/SupportRequest", support_requests()),
        ("/Quote", quotes()),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200).json_body(body);
            })
            .await;
    }
    let update_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/Quote/10").json_body(json!({
                "supportRequestId": 1,
                "sparePartIds": [2],
                "description": "Fan only",
                "totalCost": 12.5
            }));
            then.status(204);
        })
        .await;
    let stock_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path_includes("/SparePart/");
            then.status(204);
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    QuoteService::new(&client)
        .update(10, 1, &[2], "Fan only")
        .await?;

    update_mock.assert_async().await;
    stock_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_role_gating_blocks_before_network() -> Result<()> {
    let server = MockServer::start_async().await;
    let any_mock = server
        .mock_async(|when, then| {
            when.path_includes("/");
            then.status(200).json_body(json!([]));
        })
        .await;

    let (tech, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    let err = SparePartService::new(&tech)
        .create("GPU", 3, 300.0)
        .await
        .unwrap_err();
    assert!(matches!(err, SupportError::Forbidden { .. }));

    let (customer, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let err = QuoteService::new(&customer)
        .delete(10)
        .await
        .unwrap_err();
    assert!(matches!(err, SupportError::Forbidden { .. }));

    let anonymous = common::anonymous_client(server.base_url());
    let err = AppointmentService::new(&anonymous).list().await.unwrap_err();
    assert!(matches!(err, SupportError::NotAuthenticated));

    any_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_create_appointment_uses_subject_id_and_refetches() -> Result<()> {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/Appointment").json_body(json!({
                "appointmentDate": "2024-10-05T10:00",
                "location": "Durban",
                "userId": "cust-1",
                "userPhone": "0820000000"
            }));
            then.status(201);
        })
        .await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/Appointment");
            then.status(200).json_body(json!([
                { "appointmentId": 1, "appointmentDate": "2024-10-05T10:00", "location": "Durban",
                  "userId": "cust-1", "userPhone": "0820000000" },
                { "appointmentId": 2, "appointmentDate": "2024-10-06T10:00", "location": "Pretoria",
                  "userId": "cust-2", "userPhone": "0830000000" }
            ]));
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let rows = AppointmentService::new(&client)
        .create("2024-10-05T10:00", "Durban", "0820000000")
        .await?;

    create_mock.assert_async().await;
    list_mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].appointment_id, 1);
    Ok(())
}

#[tokio::test]
async fn test_required_fields_checked_locally() -> Result<()> {
    let server = MockServer::start_async().await;
    let any_mock = server
        .mock_async(|when, then| {
            when.path_includes("/");
            then.status(200);
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let err = SupportRequestService::new(&client)
        .create("Hardware", "   ")
        .await
        .unwrap_err();

    assert_eq!(err.user_friendly_message(), "Please fill in: Description");
    any_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_delete_spare_part_then_refetch() -> Result<()> {
    let server = MockServer::start_async().await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/SparePart/2");
            then.status(204);
        })
        .await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/SparePart");
            then.status(200).json_body(json!([
                { "sparePartId": 1, "name": "CPU", "stockLevel": 5, "cost": 100.0 }
            ]));
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    let rows = SparePartService::new(&client).delete(2).await?;

    delete_mock.assert_async().await;
    list_mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_server_error_surfaces_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/Appointment");
            then.status(503).body("maintenance");
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Admin", "admin-1");
    let err = AppointmentService::new(&client).list().await.unwrap_err();

    match err {
        SupportError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // a non-401 failure keeps the session
    assert!(client.session().state().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_add_spare_part_limited_to_catalog() -> Result<()> {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/SparePart").json_body(json!({
                "name": "Cooling Fan", "stockLevel": 4, "cost": 15.0
            }));
            then.status(201);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SparePart");
            then.status(200).json_body(spare_parts());
        })
        .await;

    let (admin, _) = common::client_as(server.base_url(), "Admin", "admin-1");
    let service = SparePartService::new(&admin);

    let err = service.create("Flux Capacitor", 1, 99.0).await.unwrap_err();
    assert!(matches!(err, SupportError::Validation { .. }));
    create_mock.assert_hits_async(0).await;

    let rows = service.create("cooling fan", 4, 15.0).await?;
    create_mock.assert_async().await;
    assert_eq!(rows.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_stock_update_ends_session() -> Result<()> {
    let server = MockServer::start_async().await;
    for (path, body) in [
        ("/SparePart", spare_parts()),
        ("/SupportRequest", support_requests()),
        ("/Quote", quotes()),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200).json_body(body);
            })
            .await;
    }
    server
        .mock_async(|when, then| {
            when.method(POST).path("/Quote");
            then.status(201);
        })
        .await;
    let stock_mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/SparePart/1");
            then.status(401);
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Technician", "tech-1");
    let err = QuoteService::new(&client)
        .create(1, &[1, 1], "x")
        .await
        .unwrap_err();

    assert!(matches!(err, SupportError::Unauthorized));
    // duplicated id is decremented once, and the 401 stops the loop
    stock_mock.assert_hits_async(1).await;
    assert!(!client.session().state().is_authenticated());
    assert_eq!(client.session().store().clear_count(), 1);
    Ok(())
}

/// 建立支援請求：POST 內容帶 token 的 userId 與 requestDate
#[tokio::test]
async fn test_create_support_request_stamps_user_and_date() -> Result<()> {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/SupportRequest")
                .json_body_includes(
                    json!({
                        "issueType": "Hardware",
                        "description": "Screen flickers",
                        "userId": "cust-1"
                    })
                    .to_string(),
                )
                .body_includes("\"requestDate\"");
            then.status(201);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/SupportRequest");
            then.status(200).json_body(support_requests());
        })
        .await;

    let (client, _) = common::client_as(server.base_url(), "Customer", "cust-1");
    let rows = SupportRequestService::new(&client)
        .create("Hardware", "Screen flickers")
        .await?;

    create_mock.assert_async().await;
    assert_eq!(rows.len(), 2);
    Ok(())
}
