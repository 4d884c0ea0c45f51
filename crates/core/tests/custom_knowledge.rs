use std::time::Duration;

use healthchat_core::knowledge::KnowledgeBase;
use healthchat_core::store::ConversationStore;
use healthchat_core::{ChatBuilder, KeywordAdvisor, Role, SymptomAnalyzer};
use tokio::sync::watch;
use tokio::time::timeout;

const KNOWLEDGE: &str = r#"{
    "analyzer": [{
        "keyword": "rash",
        "response": {
            "analysis": "Most rashes clear up on their own.",
            "possible_conditions": ["Contact dermatitis"],
            "should_consult_doctor": false
        }
    }],
    "recommendations": [{
        "triggers": ["rash"],
        "recommendation": { "condition": "Skin Care" }
    }]
}"#;

#[tokio::test(start_paused = true)]
async fn test_chat_with_custom_knowledge() {
    let knowledge = KnowledgeBase::from_json(KNOWLEDGE).unwrap();
    let analyzer = SymptomAnalyzer::with_knowledge(&knowledge);
    let store = ConversationStore::with_table(knowledge.recommendations().clone());

    let (idle_tx, mut idle_rx) = watch::channel(0);
    let chat = ChatBuilder::with_advisor(KeywordAdvisor::new(analyzer))
        .with_store(store)
        .on_idle(move || idle_tx.send_modify(|n| *n += 1))
        .build();

    chat.submit("An itchy rash on my arm").await.unwrap();
    timeout(Duration::from_secs(10), idle_rx.wait_for(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();

    let snapshot = chat.snapshot().await.unwrap();
    let reply = snapshot.last_message().unwrap();
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(
        reply.content(),
        "Most rashes clear up on their own.\n\n\
         Possible conditions to consider:\n• Contact dermatitis\n"
    );
    assert_eq!(
        snapshot.current_recommendation.unwrap().condition,
        "Skin Care"
    );

    // Built-in conditions are gone with the replaced tables.
    chat.submit("and a headache").await.unwrap();
    timeout(Duration::from_secs(10), idle_rx.wait_for(|n| *n == 2))
        .await
        .unwrap()
        .unwrap();
    let snapshot = chat.snapshot().await.unwrap();
    let reply = snapshot.last_message().unwrap().content();
    assert!(reply.ends_with(
        "Based on what you've shared, I'd recommend consulting with a \
         healthcare provider for proper evaluation."
    ));
    assert!(snapshot.current_recommendation.is_none());
}
