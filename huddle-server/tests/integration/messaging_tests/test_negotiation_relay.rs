use std::sync::Arc;

use huddle_core::{
    CandidateReceived, ConnectionId, NegotiationComplete, NegotiationRequested, ServerMessage,
};
use huddle_server::SignalingRouter;

use crate::integration::{create_test_router, init_tracing, room};
use crate::utils::{
    MockSignalingOutput, answer, candidate, ephemeral, frame, offer, payload,
};

async fn two_peers() -> (
    Arc<SignalingRouter>,
    MockSignalingOutput,
    ConnectionId,
    ConnectionId,
) {
    let (router, output) = create_test_router();
    let a = ConnectionId::new();
    let b = ConnectionId::new();
    router.on_connect(a, &room()).await;
    router.on_connect(b, &room()).await;
    output.clear().await;
    (router, output, a, b)
}

#[tokio::test]
async fn test_offer_reaches_named_target() {
    init_tracing();

    let (router, output, a, b) = two_peers().await;

    router
        .on_message(b, &frame(&offer(a, "e1", r#""sdp1""#)))
        .await
        .expect("offer should be forwarded");

    assert_eq!(
        output.messages_for(&a).await,
        vec![ServerMessage::NegotiationRequested(NegotiationRequested {
            from_id: b,
            offer: payload(r#""sdp1""#),
            ephemeral_id: ephemeral("e1"),
        })]
    );
    assert!(output.messages_for(&b).await.is_empty());
}

#[tokio::test]
async fn test_answer_echoes_ephemeral_id() {
    init_tracing();

    let (router, output, a, b) = two_peers().await;

    router
        .on_message(a, &frame(&answer(b, "e1", r#""sdp2""#)))
        .await
        .expect("answer should be forwarded");

    assert_eq!(
        output.messages_for(&b).await,
        vec![ServerMessage::NegotiationComplete(NegotiationComplete {
            from_id: a,
            answer: payload(r#""sdp2""#),
            ephemeral_id: ephemeral("e1"),
        })]
    );
}

#[tokio::test]
async fn test_candidates_relay_in_order_without_dedup() {
    init_tracing();

    let (router, output, a, b) = two_peers().await;
    let sent = [r#""c1""#, r#""c2""#, r#""c1""#, r#"{"candidate":"c3","sdpMid":"0"}"#];

    for c in sent {
        router.route(a, candidate(b, c)).await.unwrap();
    }
    router.route(b, candidate(a, r#""back""#)).await.unwrap();

    let expected: Vec<_> = sent
        .iter()
        .map(|c| {
            ServerMessage::CandidateReceived(CandidateReceived {
                from_id: a,
                candidate: payload(c),
            })
        })
        .collect();
    assert_eq!(output.messages_for(&b).await, expected);
    assert_eq!(
        output.messages_for(&a).await,
        vec![ServerMessage::CandidateReceived(CandidateReceived {
            from_id: b,
            candidate: payload(r#""back""#),
        })]
    );
}

#[tokio::test]
async fn test_payload_is_byte_identical() {
    init_tracing();

    let (router, output, a, b) = two_peers().await;
    let sdp = r#"{"sdp" : "v=0\r\na=group:BUNDLE 0 1\r\n","type":"answer","n":1e3}"#;
    let text = format!(
        r#"{{"op":"send-answer","d":{{"answer":{sdp},"targetId":"{b}","ephemeralId":"x"}}}}"#
    );

    router.on_message(a, &text).await.unwrap();

    let messages = output.messages_for(&b).await;
    let ServerMessage::NegotiationComplete(complete) = &messages[0] else {
        panic!("expected negotiation-complete, got {:?}", messages[0]);
    };
    assert_eq!(complete.answer.as_str(), sdp);
    assert!(messages[0].encode().unwrap().contains(sdp));
}

#[tokio::test]
async fn test_non_string_ephemeral_id_is_relayed() {
    init_tracing();

    let (router, output, a, b) = two_peers().await;
    let text = format!(
        r#"{{"op":"send-offer","d":{{"targetId":"{a}","ephemeralId":{{"try":2}},"offer":"x"}}}}"#
    );

    router.on_message(b, &text).await.unwrap();

    let messages = output.messages_for(&a).await;
    let ServerMessage::NegotiationRequested(requested) = &messages[0] else {
        panic!("expected negotiation-requested, got {:?}", messages[0]);
    };
    assert_eq!(requested.ephemeral_id.as_str(), r#"{"try":2}"#);
}
