//! Redis Streams backend against a real Redis container.
//!
//! Run with `cargo test -p message_queue -- --ignored` (needs Docker).

use message_queue::{QueueClient, QueueConfig, QueueError, QueueSpec, RedisQueueClient};
use std::time::Duration;
use test_utils::TestRedis;

const GROUP: &str = "user-registration";

fn client(redis: &TestRedis, queue: &str) -> RedisQueueClient {
    let config = QueueConfig::new(queue).with_consumer_id("consumer-test");
    RedisQueueClient::from_url(redis.connection_string(), &config).unwrap()
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_publish_consume_ack() {
    let redis = TestRedis::new().await;
    let client = client(&redis, "q-ack");

    let mut session = client.connect().await.unwrap();
    session.declare_queue(&QueueSpec::durable("q-ack")).await.unwrap();
    // Declaring twice hits BUSYGROUP and is fine
    session.declare_queue(&QueueSpec::durable("q-ack")).await.unwrap();

    session.publish("q-ack", br#"{"n":1}"#).await.unwrap();
    session.subscribe("q-ack").await.unwrap();

    let delivery = session.next_delivery().await.unwrap().unwrap();
    assert_eq!(delivery.body, br#"{"n":1}"#);
    assert!(!delivery.redelivered);
    assert_eq!(delivery.delivery_count, 1);

    session.ack(&delivery.tag).await.unwrap();
    assert!(session.next_delivery().await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_unacked_message_is_redelivered_to_next_session() {
    let redis = TestRedis::new().await;
    let client = client(&redis, "q-redeliver");

    {
        let mut session = client.connect().await.unwrap();
        session
            .declare_queue(&QueueSpec::durable("q-redeliver"))
            .await
            .unwrap();
        session.publish("q-redeliver", b"payload").await.unwrap();
        session.subscribe("q-redeliver").await.unwrap();
        let first = session.next_delivery().await.unwrap().unwrap();
        assert!(!first.redelivered);
    }

    let mut session = client.connect().await.unwrap();
    session.subscribe("q-redeliver").await.unwrap();
    let again = session.next_delivery().await.unwrap().unwrap();
    assert_eq!(again.body, b"payload");
    assert!(again.redelivered);
    session.ack(&again.tag).await.unwrap();
    assert!(session.next_delivery().await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_requeue_and_dead_letter() {
    let redis = TestRedis::new().await;
    let client = client(&redis, "q-reject");

    let mut session = client.connect().await.unwrap();
    session
        .declare_queue(&QueueSpec::durable("q-reject"))
        .await
        .unwrap();
    session.publish("q-reject", b"again").await.unwrap();
    session.subscribe("q-reject").await.unwrap();

    let d = session.next_delivery().await.unwrap().unwrap();
    session.reject(&d.tag, true).await.unwrap();

    let retry = session.next_delivery().await.unwrap().unwrap();
    assert_eq!(retry.delivery_count, 2);
    session.reject(&retry.tag, false).await.unwrap();
    assert!(session.next_delivery().await.unwrap().is_none());

    assert_eq!(redis.stream_len("q-reject:dead").await, 1);
    assert_eq!(redis.pending_count("q-reject", GROUP).await, 0);
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_abandoned_messages_are_claimed_by_another_consumer() {
    let redis = TestRedis::new().await;
    let queue = "q-claim";
    let consumer = |id: &str| {
        let config = QueueConfig::new(queue)
            .with_consumer_id(id)
            .with_claim_timeout(Duration::from_millis(200));
        RedisQueueClient::from_url(redis.connection_string(), &config).unwrap()
    };

    // A reads a batch into its pending list, handles one delivery and goes away
    {
        let mut session = consumer("consumer-a").connect().await.unwrap();
        session.declare_queue(&QueueSpec::durable(queue)).await.unwrap();
        for body in [b"one", b"two", b"six"] {
            session.publish(queue, body).await.unwrap();
        }
        session.subscribe(queue).await.unwrap();
        session.next_delivery().await.unwrap().unwrap();
        session.close().await.unwrap();
    }
    assert_eq!(
        redis.pending_consumers(queue, GROUP).await,
        vec![("consumer-a".to_string(), 3)]
    );

    // Not idle long enough yet
    let mut early = consumer("consumer-b").connect().await.unwrap();
    early.subscribe(queue).await.unwrap();
    assert!(early.next_delivery().await.unwrap().is_none());
    early.close().await.unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;

    let mut session = consumer("consumer-b").connect().await.unwrap();
    session.subscribe(queue).await.unwrap();
    let mut bodies = Vec::new();
    while let Some(delivery) = session.next_delivery().await.unwrap() {
        assert!(delivery.redelivered);
        bodies.push(delivery.body.clone());
        session.ack(&delivery.tag).await.unwrap();
    }

    assert_eq!(bodies, vec![b"one".to_vec(), b"two".to_vec(), b"six".to_vec()]);
    assert_eq!(redis.pending_count(queue, GROUP).await, 0);
}

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_exclusive_queue_is_unsupported() {
    let redis = TestRedis::new().await;
    let client = client(&redis, "q-excl");

    let mut session = client.connect().await.unwrap();
    let spec = QueueSpec {
        exclusive: true,
        ..QueueSpec::durable("q-excl")
    };
    assert!(matches!(
        session.declare_queue(&spec).await,
        Err(QueueError::Unsupported(_))
    ));
}

#[tokio::test]
async fn test_connect_to_closed_port_is_unavailable() {
    let config = QueueConfig::new("q");
    let client = RedisQueueClient::from_url("redis://127.0.0.1:1", &config).unwrap();
    let err = client.connect().await.err().unwrap();
    assert!(err.is_unavailable());
}
