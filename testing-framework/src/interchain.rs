// File: testing-framework/src/interchain.rs
//
// Interchain Setup
//
// Assembles the chains of one test, links rollapps to their hubs and brings
// everything up in dependency order:
//
// 1. attach rollapps to hubs
// 2. give every chain a funded `faucet` key on validator0
// 3. configure rollapps (their sequencer is needed by the hubs)
// 4. configure every other chain
// 5. start hubs and plain chains (hubs register their rollapps here)
// 6. start rollapps
// 7. set up, link and start relayer paths

use crate::chain::AnyChain;
use crate::relayer::{Relayer, RelayerPath};
use anyhow::{bail, Context, Result};
use rollup_e2e_common::coin::scale_amount;
use rollup_e2e_common::config::{FAUCET_KEY_NAME, GENESIS_AMOUNT_BASE};
use rollup_e2e_common::WalletData;
use std::collections::HashMap;
use std::sync::Arc;

/// Two chains connected by a relayer path
pub struct InterchainLink {
    pub chain1: AnyChain,
    pub chain2: AnyChain,
    pub relayer: Arc<dyn Relayer>,
    /// Path name the relayer knows the link by
    pub path: String,
    /// Only register the path; skip client, connection and channel creation
    pub skip_path_creation: bool,
}

struct NamedRelayer {
    name: String,
    relayer: Arc<dyn Relayer>,
}

/// Chains, rollapp attachments and relayers of one test
///
/// # Example
///
/// ```rust,ignore
/// let mut ic = Interchain::new()
///     .add_chain(hub.clone())
///     .add_chain(rollapp.clone())
///     .add_rollapp_link(hub.clone(), rollapp.clone())
///     .add_relayer(relayer.clone(), "relayer")
///     .add_link(InterchainLink { .. });
/// ic.build("TestIBCTransfer", HashMap::new()).await?;
/// ```
#[derive(Default)]
pub struct Interchain {
    chains: Vec<AnyChain>,
    rollapp_links: Vec<(AnyChain, AnyChain)>,
    relayers: Vec<NamedRelayer>,
    links: Vec<InterchainLink>,
    built: bool,
}

impl Interchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(mut self, chain: AnyChain) -> Self {
        self.chains.push(chain);
        self
    }

    /// Makes `hub` register (or serve) `rollapp`
    pub fn add_rollapp_link(mut self, hub: AnyChain, rollapp: AnyChain) -> Self {
        self.rollapp_links.push((hub, rollapp));
        self
    }

    pub fn add_relayer(mut self, relayer: Arc<dyn Relayer>, name: impl Into<String>) -> Self {
        self.relayers.push(NamedRelayer {
            name: name.into(),
            relayer,
        });
        self
    }

    pub fn add_link(mut self, link: InterchainLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn chains(&self) -> &[AnyChain] {
        &self.chains
    }

    /// Relayer registered under `name`
    pub fn relayer(&self, name: &str) -> Option<Arc<dyn Relayer>> {
        self.relayers
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.relayer.clone())
    }

    fn attach_rollapps(&self) -> Result<()> {
        for (hub, rollapp) in &self.rollapp_links {
            let Some(capability) = rollapp.as_rollapp() else {
                bail!("chain {} is not a rollapp", rollapp.name());
            };
            match hub {
                AnyChain::DymHub(h) => h.set_rollapp(capability),
                AnyChain::CelesHub(h) => h.set_rollapp(capability),
                other => bail!("chain {} cannot host rollapps", other.name()),
            }
            log::info!("attached rollapp {} to hub {}", rollapp.name(), hub.name());
        }
        Ok(())
    }

    /// Creates the faucet key on validator0 and returns its genesis wallet
    async fn faucet_wallet(chain: &AnyChain) -> Result<WalletData> {
        let config = chain.config();
        let validator0 = chain.get_node();
        validator0.create_key(FAUCET_KEY_NAME).await?;
        let address = validator0.account_key_bech32(FAUCET_KEY_NAME).await?;
        Ok(WalletData {
            address,
            denom: config.denom.clone(),
            amount: scale_amount(GENESIS_AMOUNT_BASE, config.decimals())?,
        })
    }

    async fn configure(chain: &AnyChain, extra: &HashMap<String, Vec<WalletData>>) -> Result<()> {
        let mut wallets = vec![Self::faucet_wallet(chain)
            .await
            .with_context(|| format!("creating faucet for {}", chain.name()))?];
        if let Some(more) = extra.get(chain.chain_id()) {
            wallets.extend(more.iter().cloned());
        }
        chain.configure(&wallets).await
    }

    /// Configures and starts every chain, then the relayers
    ///
    /// `wallets` are additional genesis accounts keyed by chain id. A setup
    /// can only be built once.
    pub async fn build(&mut self, test_name: &str, wallets: HashMap<String, Vec<WalletData>>) -> Result<()> {
        if self.built {
            bail!("interchain of {} is already built", test_name);
        }
        self.built = true;
        log::info!("building interchain for {} with {} chains", test_name, self.chains.len());

        self.attach_rollapps()?;

        let (rollapps, others): (Vec<&AnyChain>, Vec<&AnyChain>) =
            self.chains.iter().partition(|c| c.is_rollapp());
        for chain in rollapps.iter().chain(others.iter()) {
            Self::configure(chain, &wallets).await?;
        }
        for chain in others.iter().chain(rollapps.iter()) {
            chain.start().await?;
        }

        self.start_relayers().await
    }

    async fn start_relayers(&self) -> Result<()> {
        for link in &self.links {
            let path = RelayerPath {
                name: link.path.clone(),
                src_chain_id: link.chain1.chain_id().to_string(),
                dst_chain_id: link.chain2.chain_id().to_string(),
            };
            link.relayer
                .setup_path(&path)
                .await
                .with_context(|| format!("failed to set up path {}", link.path))?;
            if !link.skip_path_creation {
                link.relayer
                    .link_path(&link.path)
                    .await
                    .with_context(|| format!("failed to link path {}", link.path))?;
            }
        }

        for named in &self.relayers {
            let paths: Vec<String> = self
                .links
                .iter()
                .filter(|l| Arc::ptr_eq(&l.relayer, &named.relayer))
                .map(|l| l.path.clone())
                .collect();
            if paths.is_empty() {
                continue;
            }
            named
                .relayer
                .start(&paths)
                .await
                .with_context(|| format!("failed to start relayer {}", named.name))?;
        }
        Ok(())
    }

    /// Stops relayers, then every chain
    ///
    /// Every teardown step runs; the first error is returned.
    pub async fn close(&self, test_failed: bool) -> Result<()> {
        let mut first_err = None;
        for named in &self.relayers {
            if let Err(e) = named.relayer.stop().await {
                log::warn!("failed to stop relayer {}: {:#}", named.name, e);
                first_err.get_or_insert(e);
            }
        }
        for chain in &self.chains {
            if let Err(e) = chain.stop(test_failed).await {
                log::warn!("failed to stop chain {}: {:#}", chain.name(), e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
