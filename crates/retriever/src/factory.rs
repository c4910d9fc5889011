//! Shard-aware resolver wiring.
//!
//! Builds the full resolver set for a node's shard assignment: one resolver
//! per data category, each bound to its shard-derived topic and registered
//! in the container under both the data topic and the request topic.

use crate::container::ResolverContainer;
use crate::error::ConfigError;
use crate::nonce_index::NonceHashIndex;
use crate::peer_list::DiffPeerListCreator;
use crate::resolvers::{
    BlockBodyResolver, HeaderResolver, HeaderResolverConfig, TransactionResolver, TrieNodeResolver,
};
use crate::sender::TopicResolverSender;
use crate::sharding::ShardTopology;
use crate::topic::{self, request_topic};
use crate::traits::{
    AntifloodHandler, Cacher, DataPacker, DataResolver, Messenger, StorageProvider, Storer,
    TrieKind, TriesHolder, UnitType,
};
use shardsync_types::{BlockHeader, MiniBlock, ShardId, Transaction};
use std::sync::Arc;
use tracing::info;

/// In-memory data pools shared with the rest of the node.
#[derive(Clone)]
pub struct DataPools {
    pub headers: Arc<dyn Cacher<BlockHeader>>,
    pub meta_headers: Arc<dyn Cacher<BlockHeader>>,
    pub transactions: Arc<dyn Cacher<Transaction>>,
    pub unsigned_transactions: Arc<dyn Cacher<Transaction>>,
    pub reward_transactions: Arc<dyn Cacher<Transaction>>,
    pub mini_blocks: Arc<dyn Cacher<MiniBlock>>,
    pub peer_change_blocks: Arc<dyn Cacher<MiniBlock>>,
    /// Nonce → header-hash index shared by both header resolvers.
    pub header_nonces: Arc<NonceHashIndex>,
}

/// Dependencies for a [`ShardResolverFactory`].
pub struct FactoryConfig {
    pub topology: ShardTopology,
    pub messenger: Arc<dyn Messenger>,
    pub storage: Arc<dyn StorageProvider>,
    pub pools: DataPools,
    pub tries: Arc<dyn TriesHolder>,
    pub antiflood: Arc<dyn AntifloodHandler>,
    pub packer: Arc<dyn DataPacker>,
}

/// Builds the resolver container for one shard node.
pub struct ShardResolverFactory {
    topology: ShardTopology,
    messenger: Arc<dyn Messenger>,
    storage: Arc<dyn StorageProvider>,
    pools: DataPools,
    tries: Arc<dyn TriesHolder>,
    antiflood: Arc<dyn AntifloodHandler>,
    packer: Arc<dyn DataPacker>,
}

impl ShardResolverFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            topology: config.topology,
            messenger: config.messenger,
            storage: config.storage,
            pools: config.pools,
            tries: config.tries,
            antiflood: config.antiflood,
            packer: config.packer,
        }
    }

    /// Build and populate the container, or return the first wiring error.
    ///
    /// Construction order is fixed so failures are deterministic:
    /// transactions, shard headers, metachain headers, block bodies, tries.
    pub fn create(&self) -> Result<Arc<ResolverContainer>, ConfigError> {
        let container = Arc::new(ResolverContainer::new());

        self.add_transaction_resolvers(&container)?;
        self.add_header_resolver(&container)?;
        self.add_metachain_header_resolver(&container)?;
        self.add_body_resolvers(&container)?;
        self.add_trie_resolvers(&container)?;

        info!(
            shard = %self.topology.self_shard(),
            topics = container.len(),
            "resolver container built"
        );
        Ok(container)
    }

    /// Intra-shard topic suffix of this node.
    fn self_identifier(&self) -> String {
        self.topology
            .communication_identifier(self.topology.self_shard())
    }

    /// Data topic for this node's signed transactions.
    fn transaction_topic(&self) -> String {
        format!("{}{}", topic::TRANSACTIONS, self.self_identifier())
    }

    fn unit(&self, unit: UnitType) -> Result<Arc<dyn Storer>, ConfigError> {
        self.storage
            .unit(unit)
            .ok_or(ConfigError::MissingStorageUnit(unit))
    }

    fn sender_for(
        &self,
        topic_name: &str,
        excluded_topic: Option<String>,
        target_shard: ShardId,
    ) -> TopicResolverSender {
        let peer_lists = Arc::new(DiffPeerListCreator::new(
            self.messenger.clone(),
            excluded_topic,
        ));
        TopicResolverSender::new(self.messenger.clone(), peer_lists, topic_name, target_shard)
    }

    /// Register under both the data topic and the request topic so the
    /// transport can dispatch inbound traffic from either address space.
    fn register(
        &self,
        container: &ResolverContainer,
        topic_name: &str,
        resolver: Arc<dyn DataResolver>,
    ) -> Result<(), ConfigError> {
        container.add(topic_name, resolver.clone())?;
        container.add(request_topic(topic_name), resolver)?;
        Ok(())
    }

    fn add_transaction_resolvers(
        &self,
        container: &ResolverContainer,
    ) -> Result<(), ConfigError> {
        let categories: [(&str, UnitType, Arc<dyn Cacher<Transaction>>, &'static str); 3] = [
            (
                topic::TRANSACTIONS,
                UnitType::Transactions,
                self.pools.transactions.clone(),
                "transactions",
            ),
            (
                topic::UNSIGNED_TRANSACTIONS,
                UnitType::UnsignedTransactions,
                self.pools.unsigned_transactions.clone(),
                "unsigned_transactions",
            ),
            (
                topic::REWARD_TRANSACTIONS,
                UnitType::RewardTransactions,
                self.pools.reward_transactions.clone(),
                "reward_transactions",
            ),
        ];

        for (prefix, unit, pool, label) in categories {
            let topic_name = format!("{prefix}{}", self.self_identifier());
            let storage = self.unit(unit)?;
            let sender = self.sender_for(&topic_name, None, self.topology.self_shard());
            let resolver = Arc::new(TransactionResolver::new(
                sender,
                self.antiflood.clone(),
                pool,
                storage,
                self.packer.clone(),
                label,
            ));
            self.register(container, &topic_name, resolver)?;
        }
        Ok(())
    }

    fn add_header_resolver(&self, container: &ResolverContainer) -> Result<(), ConfigError> {
        let topic_name = format!(
            "{}{}",
            topic::SHARD_BLOCKS,
            self.topology.communication_identifier(ShardId::METACHAIN)
        );
        let header_storage = self.unit(UnitType::BlockHeaders)?;
        let nonce_storage = self.unit(UnitType::ShardHeaderNonceHash(
            self.topology.self_shard().0,
        ))?;

        let sender = self.sender_for(&topic_name, None, self.topology.self_shard());
        let resolver = Arc::new(HeaderResolver::new(HeaderResolverConfig {
            sender,
            antiflood: self.antiflood.clone(),
            headers: self.pools.headers.clone(),
            header_storage,
            nonce_storage,
            nonce_index: self.pools.header_nonces.clone(),
            topology: self.topology,
        }));
        self.register(container, &topic_name, resolver)
    }

    /// Metachain headers travel on their own cross-shard topic. Peers
    /// already serving this node's transaction topic are excluded from
    /// peer selection to avoid double-requesting them.
    fn add_metachain_header_resolver(
        &self,
        container: &ResolverContainer,
    ) -> Result<(), ConfigError> {
        let topic_name = format!(
            "{}{}",
            topic::METACHAIN_BLOCKS,
            self.topology.communication_identifier(ShardId::METACHAIN)
        );
        let header_storage = self.unit(UnitType::MetaBlockHeaders)?;
        let nonce_storage = self.unit(UnitType::MetaHeaderNonceHash)?;

        let excluded = Some(self.transaction_topic());
        let sender = self.sender_for(&topic_name, excluded, ShardId::METACHAIN);
        let resolver = Arc::new(HeaderResolver::new(HeaderResolverConfig {
            sender,
            antiflood: self.antiflood.clone(),
            headers: self.pools.meta_headers.clone(),
            header_storage,
            nonce_storage,
            nonce_index: self.pools.header_nonces.clone(),
            topology: self.topology,
        }));
        self.register(container, &topic_name, resolver)
    }

    fn add_body_resolvers(&self, container: &ResolverContainer) -> Result<(), ConfigError> {
        let categories: [(&str, UnitType, Arc<dyn Cacher<MiniBlock>>, &'static str); 2] = [
            (
                topic::MINI_BLOCKS,
                UnitType::MiniBlocks,
                self.pools.mini_blocks.clone(),
                "miniblocks",
            ),
            (
                topic::PEER_CHANGE_BLOCKS,
                UnitType::PeerChangeBlocks,
                self.pools.peer_change_blocks.clone(),
                "peer_change_bodies",
            ),
        ];

        for (prefix, unit, pool, label) in categories {
            let topic_name = format!("{prefix}{}", self.self_identifier());
            let storage = self.unit(unit)?;
            let sender = self.sender_for(&topic_name, None, self.topology.self_shard());
            let resolver = Arc::new(BlockBodyResolver::new(
                sender,
                self.antiflood.clone(),
                pool,
                storage,
                label,
            ));
            self.register(container, &topic_name, resolver)?;
        }
        Ok(())
    }

    /// Both trie resolvers are addressed toward the metachain and added as
    /// one batch.
    fn add_trie_resolvers(&self, container: &ResolverContainer) -> Result<(), ConfigError> {
        let meta_suffix = self.topology.communication_identifier(ShardId::METACHAIN);
        let categories: [(&str, TrieKind, &'static str); 2] = [
            (
                topic::ACCOUNT_TRIE_NODES,
                TrieKind::UserAccounts,
                "account_trie",
            ),
            (
                topic::VALIDATOR_TRIE_NODES,
                TrieKind::ValidatorAccounts,
                "validator_trie",
            ),
        ];

        let mut topics = Vec::with_capacity(categories.len() * 2);
        let mut resolvers: Vec<Arc<dyn DataResolver>> = Vec::with_capacity(categories.len() * 2);
        for (prefix, kind, label) in categories {
            let topic_name = format!("{prefix}{meta_suffix}");
            let trie = self
                .tries
                .trie(kind)
                .ok_or(ConfigError::MissingTrie(kind))?;
            let sender = self.sender_for(&topic_name, None, ShardId::METACHAIN);
            let resolver: Arc<dyn DataResolver> = Arc::new(TrieNodeResolver::new(
                sender,
                self.antiflood.clone(),
                trie,
                label,
            ));

            topics.push(topic_name.clone());
            resolvers.push(resolver.clone());
            topics.push(request_topic(&topic_name));
            resolvers.push(resolver);
        }
        container.add_multiple(topics, resolvers)?;
        Ok(())
    }
}
