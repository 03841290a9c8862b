//! End-to-end scenarios through the four boundary operations

use causal_tree_core::{protocol, Directory, EngineConfig, EngineError, Identifier, Replica};

fn visible_text(json: &str) -> String {
    let nodes: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
    nodes
        .iter()
        .filter(|node| !node["removed"].as_bool().unwrap())
        .map(|node| node["value"].as_str().unwrap())
        .collect()
}

#[test]
fn scenario_sequential_typing() {
    let mut dir = Directory::new();
    dir.add_client(1).unwrap();

    let a = dir.on_add(None, 'a', 1).unwrap();
    dir.on_add(Some(a), 'b', 1).unwrap();

    assert_eq!(visible_text(&dir.get_nodes(1).unwrap()), "ab");
}

#[test]
fn scenario_concurrent_insert_after_same_node() {
    let mut dir = Directory::with_config(EngineConfig::deferred());
    dir.add_client(1).unwrap();
    dir.add_client(2).unwrap();

    let a = dir.on_add(None, 'a', 1).unwrap();
    dir.deliver_all().unwrap();

    // Both replicas type after 'a' before seeing each other's edit.
    dir.on_add(Some(a), 'x', 1).unwrap();
    dir.on_add(Some(a), 'y', 2).unwrap();

    // Deliver in opposite orders.
    dir.deliver_at(1, 1).unwrap();
    dir.deliver_at(1, 0).unwrap();
    dir.deliver(2).unwrap();

    let one = dir.get_nodes(1).unwrap();
    let two = dir.get_nodes(2).unwrap();
    assert_eq!(one, two);

    // y(2@2) outranks x(2@1), so it is visited first.
    assert_eq!(visible_text(&one), "ayx");
}

#[test]
fn scenario_insert_after_removed_node() {
    let mut dir = Directory::new();
    dir.add_client(1).unwrap();

    let a = dir.on_add(None, 'a', 1).unwrap();
    dir.on_remove(a, 1).unwrap();
    dir.on_add(Some(a), 'z', 1).unwrap();

    let nodes = dir.nodes(1).unwrap();
    assert_eq!(dir.text(1).unwrap(), "z");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, a);
    assert!(nodes[0].removed);
    assert_eq!(nodes[1].parent_id, a);
}

#[test]
fn scenario_child_before_parent() {
    let mut dir = Directory::with_config(EngineConfig::deferred());
    dir.add_client(1).unwrap();
    dir.add_client(2).unwrap();

    let a = dir.on_add(None, 'a', 1).unwrap();
    dir.deliver(1).unwrap();
    dir.on_add(Some(a), 'b', 1).unwrap();
    dir.deliver(1).unwrap();

    // Replica 2 sees 'b' first: nothing visible yet.
    dir.deliver_at(2, 1).unwrap();
    assert_eq!(dir.get_nodes(2).unwrap(), "[]");

    dir.deliver(2).unwrap();
    assert_eq!(dir.text(2).unwrap(), "ab");
    assert_eq!(dir.get_nodes(2).unwrap(), dir.get_nodes(1).unwrap());
}

#[test]
fn classic_conflict_is_consistent_not_sensible() {
    let mut dir = Directory::with_config(EngineConfig::deferred());
    dir.add_client(1).unwrap();
    dir.add_client(2).unwrap();

    let space = dir.on_add_str(None, "Hi ", 1).unwrap();
    dir.deliver_all().unwrap();

    dir.on_add_str(Some(space), "World", 1).unwrap();
    dir.on_add_str(Some(space), "Coders", 2).unwrap();
    dir.deliver_all().unwrap();

    assert_eq!(dir.text(1).unwrap(), "Hi CodersWorld");
    assert_eq!(dir.text(2).unwrap(), "Hi CodersWorld");
}

#[test]
fn independent_documents_merge_deterministically() {
    let mut one = Replica::new(1);
    let mut two = Replica::new(2);

    for op in one.local_insert_sequence(None, "hi there").unwrap() {
        one.receive(op).unwrap();
    }
    for op in two.local_insert_sequence(None, "bye there").unwrap() {
        two.receive(op).unwrap();
    }

    // Remove the trailing 'e' of "bye there".
    let e = two.id_at(8).unwrap();
    two.receive(two.local_remove(e)).unwrap();
    assert_eq!(two.text(), "bye ther");

    one.merge(&two).unwrap();
    two.merge(&one).unwrap();

    // Both top-level chains hang off ROOT; entity 2 wins the tie.
    assert_eq!(one.text(), "bye therhi there");
    assert_eq!(two.to_json().unwrap(), one.to_json().unwrap());
}

#[test]
fn rejections_leave_state_untouched() {
    let mut dir = Directory::new();
    dir.add_client(1).unwrap();
    dir.on_add(None, 'a', 1).unwrap();
    let before = dir.get_nodes(1).unwrap();

    assert!(matches!(
        dir.on_add(None, 'b', 2),
        Err(EngineError::UnknownReplica(2))
    ));
    assert!(matches!(
        dir.on_remove(Identifier::ROOT, 1),
        Err(EngineError::MalformedOperation(_))
    ));
    assert!(matches!(dir.add_client(1), Err(EngineError::ReplicaExists(1))));

    assert_eq!(dir.get_nodes(1).unwrap(), before);
}

#[test]
fn engines_bridged_over_json() {
    let mut sender = Directory::with_config(EngineConfig::deferred());
    sender.add_client(1).unwrap();
    sender.on_add_str(None, "hey", 1).unwrap();

    let wire: Vec<String> = sender
        .inbox(1)
        .unwrap()
        .iter()
        .map(|op| protocol::encode_operation(op).unwrap())
        .collect();
    sender.deliver(1).unwrap();

    let mut receiver = Directory::new();
    receiver.add_client(2).unwrap();
    for json in wire.iter().rev() {
        let op = protocol::decode_operation(json).unwrap();
        receiver.receive(2, op).unwrap();
    }

    assert_eq!(receiver.text(2).unwrap(), "hey");
    assert_eq!(receiver.get_nodes(2).unwrap(), sender.get_nodes(1).unwrap());
    assert!(matches!(
        protocol::decode_operation(r#"{"origin":1,"kind":"remove"}"#),
        Err(EngineError::MalformedOperation(_))
    ));
}
