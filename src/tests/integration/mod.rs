//! Integration tests for the checkout flow
//!
//! Covers:
//! - The end-to-end checkout scenarios against fake collaborators
//! - The status poller running on a (paused) tokio clock
//! - A complete checkout over HTTP against mock tokenization and storefront APIs

use std::sync::Arc;
use std::time::Duration;

use crate::{
    application::{
        checkout::CheckoutError,
        status_poller::{ResultView, StatusPoller},
    },
    domain::{
        card::CreditCard,
        checkout::CheckoutStep,
        order::{OrderRecord, OrderStatus},
        validation::validate_card_at,
    },
    shared::normalizer::{FailureKind, CONNECTIVITY_MESSAGE},
    tests::{
        common::{fixtures, network_error, FakeOrderGateway, FakeTokenizer},
        config,
    },
};

/// Checkout scenarios
pub mod scenarios {
    use super::*;

    #[test]
    fn test_well_formed_card_passes_validation() {
        let card = CreditCard::new("4111 1111 1111 1111", "JOHN DOE", "12/25", "123");
        assert!(validate_card_at(&card, fixtures::today()).is_empty());
    }

    #[test]
    fn test_short_card_number_yields_single_number_error() {
        let card = CreditCard::new("1234", "JOHN DOE", "12/25", "123");
        let errors = validate_card_at(&card, fixtures::today());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "number");
    }

    #[tokio::test]
    async fn test_tokenization_network_failure_keeps_card_step() {
        config::init();
        let tokenizer = Arc::new(FakeTokenizer::new());
        tokenizer.push(Err(network_error()));
        let session = fixtures::session(tokenizer, Arc::new(FakeOrderGateway::new()));

        let err = session.submit_card(fixtures::card()).await.unwrap_err();
        let CheckoutError::Remote(error) = err else {
            panic!("expected a remote error");
        };
        assert_eq!(error.kind(), FailureKind::Network);

        let view = session.snapshot().await;
        assert_eq!(view.step, CheckoutStep::Card);
        assert_eq!(view.card, Some(fixtures::card()));
        assert_eq!(view.error.unwrap().message, CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn test_pending_order_refetches_once_after_countdown() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let session = fixtures::session(Arc::new(FakeTokenizer::new()), gateway.clone());
        session.submit_card(fixtures::card()).await.unwrap();
        session.submit_delivery(fixtures::delivery()).await.unwrap();
        let order = session.confirm_order().await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let mut poller = session.status_poller(10).await.unwrap();
        assert_eq!(
            poller.view(),
            ResultView::Pending { order_id: "ord_test".into(), refresh_in: 10 }
        );

        for _ in 0..9 {
            poller.tick().await;
        }
        assert_eq!(gateway.fetch_calls(), 0);
        assert_eq!(poller.remaining(), 1);

        poller.tick().await;
        assert_eq!(gateway.fetch_calls(), 1);
        assert_eq!(poller.remaining(), 10);
    }

    #[tokio::test]
    async fn test_pending_to_completed_stops_polling() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        gateway.push_fetch(OrderRecord::new("ord_9", OrderStatus::Completed));
        let mut poller = StatusPoller::new(
            gateway.clone(),
            OrderRecord::new("ord_9", OrderStatus::Pending),
            10,
        );

        for _ in 0..10 {
            poller.tick().await;
        }
        assert_eq!(poller.view(), ResultView::Success { order_id: "ord_9".into() });
        assert!(!poller.is_active());

        for _ in 0..25 {
            poller.tick().await;
        }
        assert_eq!(gateway.fetch_calls(), 1);
    }
}

/// Status poller on the tokio timer
pub mod poller_runtime {
    use super::*;

    fn pending_poller(gateway: Arc<FakeOrderGateway>) -> StatusPoller {
        StatusPoller::new(gateway, OrderRecord::new("ord_1", OrderStatus::Pending), 10)
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_ten_seconds_then_stop() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        gateway.push_fetch(OrderRecord::new("ord_1", OrderStatus::Completed));
        let mut handle = pending_poller(gateway.clone()).spawn(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(gateway.fetch_calls(), 0);
        assert_eq!(
            handle.view(),
            ResultView::Pending { order_id: "ord_1".into(), refresh_in: 1 }
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(gateway.fetch_calls(), 1);
        assert_eq!(handle.view(), ResultView::Success { order_id: "ord_1".into() });

        handle.finished().await;
        assert!(handle.is_finished());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.fetch_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_still_pending_keeps_cycling() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let handle = pending_poller(gateway.clone()).spawn(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(30_500)).await;
        assert_eq!(gateway.fetch_calls(), 3);
        assert!(!handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_timer() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let handle = pending_poller(gateway.clone()).spawn(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(gateway.fetch_calls(), 1);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.fetch_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let mut handle = pending_poller(gateway.clone()).spawn(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        handle.cancel();
        handle.finished().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_order_redirects_and_finishes() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let poller = StatusPoller::new(
            gateway.clone(),
            OrderRecord::new("ord_2", OrderStatus::Failed),
            10,
        );
        let mut handle = poller.spawn(Duration::from_secs(1));

        let mut views = Vec::new();
        while let Some(view) = handle.changed().await {
            views.push(view);
        }

        assert_eq!(views.len(), 10);
        assert_eq!(
            views[0],
            ResultView::Failure { order_id: "ord_2".into(), redirect_in: 9 }
        );
        assert_eq!(views.last(), Some(&ResultView::Redirect));
        assert_eq!(gateway.fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_publishes_once_and_finishes() {
        config::init();
        let gateway = Arc::new(FakeOrderGateway::new());
        let poller = StatusPoller::new(gateway.clone(), OrderRecord::new("ord_3", OrderStatus::Paid), 10);
        let mut handle = poller.spawn(Duration::from_secs(1));

        assert_eq!(handle.changed().await, None);
        assert_eq!(handle.view(), ResultView::Success { order_id: "ord_3".into() });
        assert_eq!(gateway.fetch_calls(), 0);
    }
}

/// Full checkout over HTTP
pub mod http_flow {
    use super::*;
    use crate::domain::ports::{OrderGateway, ProductCatalog};
    use crate::infrastructure::adapters::{StorefrontApiClient, TokenizationClient};
    use crate::application::checkout::CheckoutSession;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_checkout_against_mock_apis() {
        config::init();
        let payments = MockServer::start().await;
        let storefront = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/cards"))
            .and(header("authorization", "Bearer test_public_key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "tok_live_1"}})))
            .expect(1)
            .mount(&payments)
            .await;
        Mock::given(method("GET"))
            .and(path("/product/64f1c0ffee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "64f1c0ffee",
                "name": "Wireless headphones",
                "price": 120000,
                "stock": 4
            })))
            .mount(&storefront)
            .await;
        Mock::given(method("POST"))
            .and(path("/order"))
            .and(body_partial_json(json!({
                "paymentData": {"deviceId": "device-test", "sesionId": "session-test", "tokenId": "tok_live_1"},
                "feeDelivery": 8500.0,
                "feeBought": 120000.0
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "ord_http", "status": "PENDING"})))
            .expect(1)
            .mount(&storefront)
            .await;
        Mock::given(method("GET"))
            .and(path("/order/ord_http"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "ord_http", "status": "PAID"})))
            .mount(&storefront)
            .await;

        let mut app_config = config::test_config();
        app_config.api.base_url = storefront.uri();
        app_config.tokenization.base_url = payments.uri();

        let tokenizer = Arc::new(TokenizationClient::new(&app_config.tokenization).unwrap());
        let api = Arc::new(StorefrontApiClient::new(&app_config.api).unwrap());

        let product = api.get_product("64f1c0ffee").await.unwrap();
        let gateway: Arc<dyn OrderGateway> = api.clone();
        let session = CheckoutSession::start(
            product,
            1,
            &app_config.fee_schedule(),
            app_config.widget_session().into(),
            tokenizer,
            gateway,
        )
        .unwrap()
        .with_clock(fixtures::today);

        session.submit_card(fixtures::card()).await.unwrap();
        session.submit_delivery(fixtures::delivery()).await.unwrap();
        let order = session.confirm_order().await.unwrap();
        assert_eq!(order, OrderRecord::new("ord_http", OrderStatus::Pending));

        let mut poller = session.status_poller(2).await.unwrap();
        poller.tick().await;
        let view = poller.tick().await;
        assert_eq!(view, ResultView::Success { order_id: "ord_http".into() });
    }
}

/// Command-line driver against mock APIs
pub mod cli_driver {
    use super::*;
    use crate::driver;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_order_file(card: Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!("order-{}.json", uuid::Uuid::new_v4()));
        let order = json!({
            "productId": "64f1c0ffee",
            "quantity": 2,
            "card": card,
            "delivery": {
                "fullName": "Ana Gomez",
                "address": "Calle 10 # 5-20",
                "city": "Bogota",
                "zipCode": "110111",
                "phone": "3001234567",
                "email": "ana@example.com"
            }
        });
        std::fs::write(&path, order.to_string()).unwrap();
        path
    }

    async fn mount_product(storefront: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/product/64f1c0ffee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "64f1c0ffee",
                "name": "Wireless headphones",
                "price": 120000,
                "stock": 4
            })))
            .mount(storefront)
            .await;
    }

    fn app_config(payments: &MockServer, storefront: &MockServer) -> crate::config::AppConfig {
        let mut app_config = config::test_config();
        app_config.api.base_url = storefront.uri();
        app_config.tokenization.base_url = payments.uri();
        app_config.checkout.tick_millis = 10;
        app_config
    }

    #[tokio::test]
    async fn test_paid_order_ends_in_success() {
        config::init();
        let payments = MockServer::start().await;
        let storefront = MockServer::start().await;
        mount_product(&storefront).await;

        Mock::given(method("POST"))
            .and(path("/tokens/cards"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "tok_cli"}})))
            .expect(1)
            .mount(&payments)
            .await;
        Mock::given(method("POST"))
            .and(path("/order"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "ord_cli", "status": "PAID"})))
            .expect(1)
            .mount(&storefront)
            .await;

        let order_path = write_order_file(json!({
            "number": "4111 1111 1111 1111",
            "name": "JOHN DOE",
            "expiry": "12/49",
            "cvc": "123"
        }));
        let outcome = driver::run(&order_path, &app_config(&payments, &storefront)).await;
        std::fs::remove_file(&order_path).ok();

        let view = outcome.unwrap();
        assert!(view.is_success());
        assert_eq!(view, ResultView::Success { order_id: "ord_cli".into() });
        assert_eq!(driver::exit_code(&Ok(view)), 0);
    }

    #[tokio::test]
    async fn test_invalid_card_fails_before_any_payment_call() {
        config::init();
        let payments = MockServer::start().await;
        let storefront = MockServer::start().await;
        mount_product(&storefront).await;

        Mock::given(method("POST"))
            .and(path("/tokens/cards"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "tok_cli"}})))
            .expect(0)
            .mount(&payments)
            .await;
        Mock::given(method("POST"))
            .and(path("/order"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "ord_cli", "status": "PAID"})))
            .expect(0)
            .mount(&storefront)
            .await;

        let order_path = write_order_file(json!({
            "number": "1234",
            "name": "JOHN DOE",
            "expiry": "12/49",
            "cvc": "123"
        }));
        let outcome = driver::run(&order_path, &app_config(&payments, &storefront)).await;
        std::fs::remove_file(&order_path).ok();

        let err = outcome.as_ref().unwrap_err();
        assert_eq!(err.to_string(), "Card step failed");
        assert!(format!("{:#}", err).contains("number: Invalid card number"));
        assert_eq!(driver::exit_code(&outcome), 1);
    }
}
