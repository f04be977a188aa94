mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};

use support::{app, PASSWORD};

fn customer(name: &str, department_id: Option<&str>) -> Value {
    json!({
        "company_name": name,
        "settlement_method": "月结",
        "rate": 12.5,
        "contact_person": "张三",
        "contact_phone": "010-88886666",
        "department_id": department_id,
    })
}

#[tokio::test]
async fn non_admin_roles_are_kept_out_of_admin_operations() {
    let app = app();
    app.seed("13900000101", &["waybill", "booking", "settlement"]).await;
    let token = app.login("13900000101").await;

    for (method, uri, body) in [
        ("GET", "/api/v1/users", None),
        ("POST", "/api/v1/users", Some(json!({ "phone": "13900000102", "password": PASSWORD, "name": "x" }))),
        ("PUT", "/api/v1/users/batch-status", Some(json!({ "ids": [], "is_active": false }))),
        ("GET", "/api/v1/departments", None),
        ("POST", "/api/v1/departments", Some(json!({ "name": "操作部" }))),
        ("PUT", "/api/v1/parameters/fuel_rate", Some(json!({ "value": "1.2" }))),
    ] {
        let (status, resp) = app.call(method, uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(resp["code"], 403);
    }
}

#[tokio::test]
async fn admin_manages_accounts() {
    let app = app();
    let (_, admin) = app.admin().await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/users",
            Some(&admin),
            Some(json!({ "phone": "13900000201", "password": PASSWORD, "name": "李四", "permissions": ["运单管理"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["msg"], "账号创建成功");
    assert_eq!(body["data"]["roles"], json!(["waybill"]));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call("POST", "/api/v1/users", Some(&admin), Some(json!({ "phone": "13900000201", "password": PASSWORD, "name": "dup" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.call("GET", "/api/v1/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);

    let (status, body) = app.call("PUT", &format!("/api/v1/users/{id}/status?is_active=false"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);
    let (status, _) = app
        .call("POST", "/api/v1/auth/login", None, Some(json!({ "phone": "13900000201", "password": PASSWORD })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call("DELETE", &format!("/api/v1/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call("DELETE", &format!("/api/v1/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let app = app();
    let (admin_id, admin) = app.admin().await;
    let other = app.seed("13900000301", &[]).await;

    let (status, _) = app.call("DELETE", &format!("/api/v1/users/{admin_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("DELETE", "/api/v1/users", Some(&admin), Some(json!({ "user_ids": [other, admin_id] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 批量删除被拒绝时不应删除任何账号
    let (_, body) = app.call("GET", "/api/v1/users", Some(&admin), None).await;
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn changing_another_accounts_password_needs_admin() {
    let app = app();
    let (_, admin) = app.admin().await;
    let a = app.seed("13900000401", &[]).await;
    let b = app.seed("13900000402", &[]).await;
    let token_a = app.login("13900000401").await;

    let (status, _) = app
        .call("PUT", "/api/v1/users/password", Some(&token_a), Some(json!({ "user_id": b, "password": "hijacked1" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("PUT", "/api/v1/users/password", Some(&admin), Some(json!({ "user_id": a, "password": "reset-by-admin" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call("POST", "/api/v1/auth/login", None, Some(json!({ "phone": "13900000401", "password": "reset-by-admin" })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn department_with_customers_cannot_be_deleted() {
    let app = app();
    let (_, admin) = app.admin().await;

    let (status, body) = app.call("POST", "/api/v1/departments", Some(&admin), Some(json!({ "name": "华东销售部" }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let dept = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.call("POST", "/api/v1/departments", Some(&admin), Some(json!({ "name": "华东销售部" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.call("POST", "/api/v1/customers", Some(&admin), Some(customer("东方航空物流", Some(&dept)))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let cust = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.call("DELETE", &format!("/api/v1/departments/{dept}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, _) = app.call("DELETE", &format!("/api/v1/customers/{cust}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call("DELETE", &format!("/api/v1/departments/{dept}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call("GET", &format!("/api/v1/departments/{dept}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customers_are_open_to_every_account_except_delete() {
    let app = app();
    app.seed("13900000501", &["booking"]).await;
    let token = app.login("13900000501").await;

    let (status, body) = app.call("POST", "/api/v1/customers", Some(&token), Some(customer("顺丰航空", None))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call("PUT", &format!("/api/v1/customers/{id}"), Some(&token), Some(json!({ "rate": 9.8 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rate"], 9.8);
    assert_eq!(body["data"]["company_name"], "顺丰航空");

    let (status, _) = app
        .call("PUT", &format!("/api/v1/customers/{id}"), Some(&token), Some(json!({ "rate": -1.0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call("DELETE", &format!("/api/v1/customers/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_search_filters_and_paginates() {
    let app = app();
    let (_, admin) = app.admin().await;
    for i in 0..12 {
        let name = if i % 2 == 0 { format!("国航货运{i}") } else { format!("南航物流{i}") };
        let (status, _) = app.call("POST", "/api/v1/customers", Some(&admin), Some(customer(&name, None))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.call("GET", "/api/v1/customers?page=3&page_size=5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 12);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let (_, body) = app.call("GET", "/api/v1/customers?page_size=1000", Some(&admin), None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 12);

    let uri = format!("/api/v1/customers?company_name={}", "%E5%9B%BD%E8%88%AA");
    let (_, body) = app.call("GET", &uri, Some(&admin), None).await;
    assert_eq!(body["data"]["total"], 6);
    // 最新创建的排在前面
    assert_eq!(body["data"]["items"][0]["company_name"], "国航货运10");

    let (status, body) = app.call("GET", "/api/v1/customers?page=abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn business_parameters_round_trip() {
    let app = app();
    let (_, admin) = app.admin().await;
    app.seed("13900000601", &["waybill"]).await;
    let token = app.login("13900000601").await;

    let (status, body) = app
        .call("PUT", "/api/v1/parameters/fuel_surcharge", Some(&admin), Some(json!({ "value": "1.35", "description": "燃油附加费" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app.call("GET", "/api/v1/parameters/fuel_surcharge", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "1.35");
    assert_eq!(body["data"]["description"], "燃油附加费");

    let (status, _) = app.call("PUT", "/api/v1/parameters/fuel_surcharge", Some(&admin), Some(json!({ "value": "1.40" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.call("GET", "/api/v1/parameters", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["value"], "1.40");

    let (status, _) = app.call("PUT", "/api/v1/parameters/bad%20key", Some(&admin), Some(json!({ "value": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call("DELETE", "/api/v1/parameters/fuel_surcharge", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call("GET", "/api/v1/parameters/fuel_surcharge", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn business_config_is_initialized_once_per_account() {
    let app = app();
    app.seed("13900000701", &[]).await;
    let token = app.login("13900000701").await;

    let (status, _) = app.call("GET", "/api/v1/config/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let data = json!({ "CA": { "export": { "surcharge": { "fuel": "1.2" } } } });
    let (status, body) = app
        .call("POST", "/api/v1/config/initialize", Some(&token), Some(json!({ "config_data": data })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["msg"], "配置初始化成功");

    let (status, _) = app
        .call("POST", "/api/v1/config/initialize", Some(&token), Some(json!({ "config_data": data })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let updated = json!({ "MU": {} });
    let (status, _) = app
        .call("PUT", "/api/v1/config/current", Some(&token), Some(json!({ "config_data": updated })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.call("GET", "/api/v1/config/current", Some(&token), None).await;
    assert_eq!(body["data"]["config_data"], updated);

    let (_, body) = app
        .call("POST", "/api/v1/auth/login", None, Some(json!({ "phone": "13900000701", "password": PASSWORD })))
        .await;
    assert_eq!(body["data"]["has_initialized"], true);
}
