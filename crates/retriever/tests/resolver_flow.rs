//! End-to-end flows through the factory-built resolver container.

use sbor::prelude::*;
use shardsync_retriever::test_helpers::{MemStorageProvider, MemTriesHolder, MockMessenger};
use shardsync_retriever::{
    decode_request, DataCache, DataPools, FactoryConfig, NonceHashIndex, NoopAntiflood,
    RequestData, RequestKind, ResolveError, ServeOutcome, ShardResolverFactory, ShardTopology,
    SliceDataPacker,
};
use shardsync_types::{nonce_to_bytes, BlockHeader, Hash, PeerId, ShardId};
use std::sync::Arc;

struct Node {
    container: Arc<shardsync_retriever::ResolverContainer>,
    messenger: Arc<MockMessenger>,
    headers: Arc<DataCache<BlockHeader>>,
    storage: Arc<MemStorageProvider>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Wire a shard-0 node in a 2-shard network.
fn build_node() -> Node {
    init_tracing();
    let messenger = Arc::new(MockMessenger::new());
    let headers = Arc::new(DataCache::new(64));
    let storage = Arc::new(MemStorageProvider::for_shard(ShardId(0)));

    let pools = DataPools {
        headers: headers.clone(),
        meta_headers: Arc::new(DataCache::new(64)),
        transactions: Arc::new(DataCache::new(64)),
        unsigned_transactions: Arc::new(DataCache::new(64)),
        reward_transactions: Arc::new(DataCache::new(64)),
        mini_blocks: Arc::new(DataCache::new(64)),
        peer_change_blocks: Arc::new(DataCache::new(64)),
        header_nonces: Arc::new(NonceHashIndex::new()),
    };

    let factory = ShardResolverFactory::new(FactoryConfig {
        topology: ShardTopology::new(ShardId(0), 2).unwrap(),
        messenger: messenger.clone(),
        storage: storage.clone(),
        pools,
        tries: Arc::new(MemTriesHolder::new()),
        antiflood: Arc::new(NoopAntiflood),
        packer: Arc::new(SliceDataPacker),
    });

    Node {
        container: factory.create().unwrap(),
        messenger,
        headers,
        storage,
    }
}

fn sample_header(nonce: u64) -> BlockHeader {
    BlockHeader {
        shard: ShardId(0),
        nonce,
        epoch: 0,
        prev_hash: Hash::from_bytes(b"prev"),
        state_root: Hash::from_bytes(b"root"),
        timestamp: 1_700_000_000_000,
    }
}

#[test]
fn request_by_nonce_reaches_one_peer_on_the_request_topic() {
    let node = build_node();
    let topic_peers = [PeerId(10), PeerId(11), PeerId(12)];
    node.messenger.set_peers("shardBlocks_0_META", &topic_peers);

    // The transport looks resolvers up by the topic it received traffic on,
    // including the request topic.
    let resolver = node.container.get("shardBlocks_0_META_REQUEST").unwrap();
    resolver.request_by_nonce(42).unwrap();

    let sent = node.messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, "shardBlocks_0_META_REQUEST");
    assert!(topic_peers.contains(&sent[0].peer));

    let request = decode_request(&sent[0].payload).unwrap();
    assert_eq!(request.kind, RequestKind::Nonce);
    assert_eq!(request.value, nonce_to_bytes(42));
}

#[test]
fn inbound_hash_request_is_answered_from_the_header_pool() {
    let node = build_node();
    let header = sample_header(7);
    let hash = header.hash();
    node.headers
        .insert(hash.as_bytes().to_vec(), Arc::new(header.clone()));

    let resolver = node.container.get("shardBlocks_0_META").unwrap();
    let payload = shardsync_retriever::encode_request(&RequestData::from_hash(hash.as_bytes()))
        .unwrap();
    let outcome = resolver.process_message(&payload, PeerId(99)).unwrap();
    assert_eq!(outcome, ServeOutcome::Sent);

    let sent = node.messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].peer, PeerId(99));
    assert_eq!(sent[0].topic, "shardBlocks_0_META");
    assert_eq!(sent[0].payload, basic_encode(&header).unwrap());
}

#[test]
fn inbound_request_with_undecodable_payload_is_a_protocol_error() {
    let node = build_node();
    let resolver = node.container.get("shardBlocks_0_META").unwrap();

    let result = resolver.process_message(&[0xDE, 0xAD, 0xBE, 0xEF], PeerId(99));
    assert!(matches!(result, Err(ResolveError::MalformedRequest(_))));
    assert!(node.messenger.sent().is_empty());
}

#[test]
fn storage_resident_header_is_served_byte_identical() {
    let node = build_node();
    let stored = b"raw wire-encoded header from disk".to_vec();
    node.storage
        .storer(shardsync_retriever::UnitType::BlockHeaders)
        .unwrap()
        .put(b"disk-hash".to_vec(), stored.clone());

    let resolver = node.container.get("shardBlocks_0_META").unwrap();
    let payload =
        shardsync_retriever::encode_request(&RequestData::from_hash(b"disk-hash")).unwrap();
    resolver.process_message(&payload, PeerId(5)).unwrap();

    assert_eq!(node.messenger.sent()[0].payload, stored);
}

#[test]
fn transaction_resolver_is_wired_to_its_own_topics() {
    let node = build_node();
    node.messenger.set_peers("transactions_0", &[PeerId(1)]);

    let resolver = node.container.get("transactions_0").unwrap();
    resolver.request_by_hash(b"tx-hash").unwrap();

    let sent = node.messenger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, "transactions_0_REQUEST");

    // Headers-only lookups are rejected on this topic.
    assert!(matches!(
        resolver.request_by_nonce(1),
        Err(ResolveError::Unsupported(_))
    ));
}
