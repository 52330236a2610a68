//! Deployment run: deploy the contract set, wire it, export its artifacts.

use alloy::primitives::Address;
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use bns_core::constants::{
    ABI_METADATA_GEN, ABI_REGISTRAR, ABI_REGISTRY, ADD_TLD_METHOD, FACT_METADATA_GEN,
    FACT_REGISTRAR, FACT_REGISTRIES, LABEL_VALIDATOR_CONTRACT, METADATA_GEN_CONTRACT,
    MOCK_STABLECOIN_CONTRACT, PUBLIC_REGISTRAR_CONTRACT, REGISTRY_CONTRACT, ZERO_ADDRESS,
};
use bns_core::utils::parse_address;
use bns_core::{
    BnsError, ContractCall, ContractDeployer, DeployRequest, DeployedContract, DeployerAccounts,
    FactSet, NetworkProfile, PathParams, ProxyInit, Result, Status,
};
use bns_export::{AbiArtifact, ArtifactExporter, ExportReport};
use bns_ipfs::{AddedContent, IpfsClient};

use crate::config::DeployConfig;

/// Outcome of a deployment run.
#[derive(Debug)]
pub struct RunSummary {
    /// Network name
    pub network: String,
    /// Chain id reported by the deployer
    pub chain_id: u64,
    /// Accounts used
    pub accounts: DeployerAccounts,
    /// Stablecoin the registrar was initialised with
    pub stablecoin: Address,
    /// Contract info facts (`metadataGen`, `registrar`, `registries`)
    pub facts: FactSet,
    /// TLD → `[chainId]` facts
    pub tlds_chain_ids: FactSet,
    /// Hash of the `addTLD` multicall, when broadcast
    pub multicall_tx: Option<String>,
    /// Export of `tlds_chain_ids`
    pub tld_export: ExportReport,
    /// Export of `facts`
    pub contract_export: ExportReport,
    /// ABI export
    pub abi_export: ExportReport,
    /// IPFS publication of the contract info, when requested
    pub published: Option<Status<AddedContent>>,
}

impl RunSummary {
    /// True if every export succeeded and publishing (if any) succeeded.
    pub fn is_success(&self) -> bool {
        self.tld_export.is_success()
            && self.contract_export.is_success()
            && self.abi_export.is_success()
            && !self.published.as_ref().is_some_and(Status::is_error)
    }

    /// Number of failed export targets across all exports.
    pub fn export_failures(&self) -> usize {
        self.tld_export.failures().count()
            + self.contract_export.failures().count()
            + self.abi_export.failures().count()
    }
}

/// Runs the BNS deployment sequence through a [`ContractDeployer`].
pub struct Orchestrator<D> {
    deployer: D,
    config: DeployConfig,
    exporter: ArtifactExporter,
    ipfs: Option<IpfsClient>,
}

impl<D: ContractDeployer> Orchestrator<D> {
    /// Creates an orchestrator; the exporter follows `config.exporter`.
    pub fn new(deployer: D, config: DeployConfig) -> Self {
        let exporter = ArtifactExporter::with_config(config.exporter);
        Self {
            deployer,
            config,
            exporter,
            ipfs: None,
        }
    }

    /// Publishes contract info through `client` when `publish_to_ipfs` is set.
    pub fn with_ipfs(mut self, client: IpfsClient) -> Self {
        self.ipfs = Some(client);
        self
    }

    /// The deployer.
    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    /// Deploys every contract for `profile` and exports the results.
    ///
    /// Deployment failures abort the run. Export and publish failures are
    /// reported in the summary.
    #[instrument(skip(self, profile), fields(network = %profile.name))]
    pub async fn run(&self, profile: &NetworkProfile) -> Result<RunSummary> {
        let accounts = self.deployer.accounts().await?;
        let chain_id = self.deployer.chain_id().await?;

        if let Some(expected) = profile.chain_id {
            if expected != chain_id {
                return Err(BnsError::ConfigError(format!(
                    "{} expects chain id {}, deployer is on {}",
                    profile.name, expected, chain_id
                )));
            }
        }

        info!(proxy_admin = %accounts.proxy_admin, "ProxyAdmin");
        info!(owner = %accounts.owner, "Owner");
        info!(network = %profile.name, chain_id, "Network");

        let owner = accounts.owner;
        let mut facts = FactSet::new();

        // ─── Stablecoin ───
        let mock = if profile.is_local() {
            Some(self.deploy_mock_stablecoin(owner).await?)
        } else {
            None
        };
        let stablecoin = match (profile.payment.default_stablecoin.as_deref(), mock) {
            (Some(configured), _) => parse_address(configured)?,
            (None, Some(mock)) => mock.address,
            // Non-local networks without a configured stablecoin use a
            // previously deployed mock.
            (None, None) => self.deploy_mock_stablecoin(owner).await?.address,
        };

        // ─── Support contracts ───
        info!("Deploying MetadataGen contract");
        let metadata_gen = self
            .deployer
            .deploy(DeployRequest::new(METADATA_GEN_CONTRACT, owner))
            .await?;
        info!(address = %metadata_gen.address_string(), "MetadataGen deployed");
        facts.insert_value(FACT_METADATA_GEN, json!(metadata_gen.address_string()));

        info!("Deploying LabelValidator contract");
        let validator = self
            .deployer
            .deploy(DeployRequest::new(LABEL_VALIDATOR_CONTRACT, owner))
            .await?;
        info!(address = %validator.address_string(), "LabelValidator deployed");

        // ─── Registrar ───
        info!("Deploying PublicRegistrar contract");
        let registrar = self
            .deployer
            .deploy(
                DeployRequest::new(PUBLIC_REGISTRAR_CONTRACT, owner).with_proxy(
                    ProxyInit::transparent(
                        owner,
                        vec![
                            address_arg(&owner),
                            json!(ZERO_ADDRESS),
                            address_arg(&stablecoin),
                            address_arg(&validator.address),
                        ],
                    ),
                ),
            )
            .await?;
        info!(address = %registrar.address_string(), "PublicRegistrar deployed");
        facts.insert_value(FACT_REGISTRAR, json!(registrar.address_string()));

        // ─── Registries ───
        let minters = json!([address_arg(&owner), address_arg(&registrar.address)]);
        let mut registries: Vec<(String, DeployedContract)> = Vec::with_capacity(profile.tlds.len());
        let mut tlds_chain_ids = FactSet::new();

        for tld in &profile.tlds {
            info!(tld = %tld.tld_name, "Deploying {} Registry contract", tld.name);
            let registry = self
                .deployer
                .deploy(
                    DeployRequest::new(REGISTRY_CONTRACT, owner)
                        .named(format!("{}_{}", REGISTRY_CONTRACT, tld.tld_name))
                        .with_proxy(ProxyInit::transparent(
                            owner,
                            vec![
                                json!(tld.name),
                                json!(tld.symbol),
                                json!(tld.tld_name),
                                json!(tld.web_host),
                                minters.clone(),
                                address_arg(&metadata_gen.address),
                                address_arg(&validator.address),
                            ],
                        )),
                )
                .await?;
            info!(tld = %tld.tld_name, address = %registry.address_string(), "Registry deployed");

            tlds_chain_ids.insert_value(tld.tld_name.to_lowercase(), json!([chain_id]));
            registries.push((tld.tld_name.clone(), registry));
        }

        let registry_facts: Map<String, Value> = registries
            .iter()
            .map(|(tld, registry)| (tld.clone(), json!(registry.address_string())))
            .collect();
        facts.insert_value(FACT_REGISTRIES, Value::Object(registry_facts));

        // ─── addTLD multicall ───
        let multicall_tx = if registries.is_empty() {
            None
        } else {
            let prices = json!(self.config.domain_prices.to_wei_strings());
            let calls = registries
                .iter()
                .map(|(tld, registry)| {
                    ContractCall::new(
                        ADD_TLD_METHOD,
                        vec![json!(tld), address_arg(&registry.address), prices.clone()],
                    )
                })
                .collect();

            info!(tlds = registries.len(), "Running addTLD in multicall mode");
            let tx = self.deployer.multicall(&registrar, calls).await?;
            match &tx {
                Some(hash) => info!(tx = %hash, "addTLD multicall sent"),
                None => info!("addTLD multicall queued"),
            }
            tx
        };

        // ─── Export ───
        let params = PathParams::new(chain_id);

        info!("Exporting TLDs info");
        let tld_export = self
            .exporter
            .export_facts(&tlds_chain_ids, &self.config.tlds_targets(), &params)
            .await;

        info!("Exporting contract info");
        let contract_export = self
            .exporter
            .export_facts(&facts, &self.config.contract_info_targets(), &params)
            .await;

        info!("Exporting ABI files");
        let mut abis = vec![
            AbiArtifact::new(ABI_REGISTRAR, registrar.abi.clone()),
            AbiArtifact::new(ABI_METADATA_GEN, metadata_gen.abi.clone()),
        ];
        if let Some((_, last)) = registries.last() {
            abis.push(AbiArtifact::new(ABI_REGISTRY, last.abi.clone()));
        }
        let abi_export = self
            .exporter
            .export_abis(&abis, &self.config.abi_export_paths, chain_id)
            .await;

        let published = self.publish(&facts, chain_id).await;

        Ok(RunSummary {
            network: profile.name.clone(),
            chain_id,
            accounts,
            stablecoin,
            facts,
            tlds_chain_ids,
            multicall_tx,
            tld_export,
            contract_export,
            abi_export,
            published,
        })
    }

    async fn deploy_mock_stablecoin(&self, owner: Address) -> Result<DeployedContract> {
        info!("Deploying ERC20 USDC mock token");
        let mock = self
            .deployer
            .deploy(DeployRequest::new(MOCK_STABLECOIN_CONTRACT, owner))
            .await?;
        info!(address = %mock.address_string(), "USDC mock token deployed");
        Ok(mock)
    }

    async fn publish(&self, facts: &FactSet, chain_id: u64) -> Option<Status<AddedContent>> {
        if !self.config.publish_to_ipfs {
            return None;
        }

        let Some(ipfs) = &self.ipfs else {
            warn!("publishToIpfs is set but no IPFS client was provided");
            return Some(Status::error("no IPFS client configured", None));
        };

        let document = match serde_json::to_string_pretty(facts) {
            Ok(document) => document,
            Err(e) => return Some(Status::error(e.to_string(), None)),
        };

        let status = ipfs
            .add_text_content(&document, Some(&format!("{}.json", chain_id)))
            .await;
        match status.data() {
            Some(added) => info!(cid = %added.cid, url = %added.url, "Contract info published"),
            None => warn!(message = status.message(), "Contract info publish failed"),
        }
        Some(status)
    }
}

fn address_arg(address: &Address) -> Value {
    json!(address.to_checksum(None))
}
