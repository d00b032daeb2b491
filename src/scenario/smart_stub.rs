//! # Smart Stub
//!
//! Generation of ISO 20022 payment messages from natural-language intent,
//! with response caching for deterministic replay in CI.
//!
//! Without an LLM provider the stub answers from built-in templates keyed
//! on intent keywords; with one, model output is cached per intent so a
//! pipeline re-run replays identical messages.

use crate::scenario::llm::LlmProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// System prompt for LLM-backed ISO 20022 generation.
const ISO20022_SYSTEM_PROMPT: &str = r#"You are an expert in ISO 20022 (SWIFT) message formats. Generate valid XML
messages based on the user's intent. Follow the ISO 20022 schema strictly.
Common message types:
- pacs.008: FI to FI Customer Credit Transfer
- pacs.009: FI to FI Financial Institution Credit Transfer
- camt.053: Bank to Customer Statement
- sese.023: Securities Settlement Transaction Instruction
Return ONLY the XML content with no explanation."#;

/// Intent-driven ISO 20022 message generator with caching.
pub struct SmartStub {
    provider: Option<Arc<dyn LlmProvider>>,
    cache_responses: bool,
    response_cache: RwLock<HashMap<String, String>>,
}

impl SmartStub {
    /// Creates a template-only stub with caching enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            cache_responses: true,
            response_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Attaches an LLM provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Disables response caching.
    #[must_use]
    pub fn without_caching(mut self) -> Self {
        self.cache_responses = false;
        self
    }

    /// Generates an ISO 20022 message for the given intent.
    ///
    /// Cached responses are returned verbatim. When no provider is
    /// configured or the provider is unreachable, a built-in template
    /// answers.
    pub async fn generate_payment_message(&self, intent: &str) -> String {
        info!(intent, "Generating ISO 20022 message");

        if self.cache_responses
            && let Some(cached) = self.response_cache.read().await.get(intent)
        {
            debug!(intent, "Returning cached ISO 20022 message");
            return cached.clone();
        }

        let message = match &self.provider {
            Some(provider) if provider.is_available().await => {
                match provider.complete(ISO20022_SYSTEM_PROMPT, intent).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(error = %e, "LLM generation failed, using template");
                        template_for(intent)
                    }
                }
            }
            _ => template_for(intent),
        };

        if self.cache_responses {
            self.response_cache
                .write()
                .await
                .insert(intent.to_string(), message.clone());
        }
        message
    }

    /// Pre-loads a cached response for an intent. Useful for fully
    /// deterministic test setups.
    pub async fn cache_response(&self, intent: impl Into<String>, response: impl Into<String>) {
        self.response_cache
            .write()
            .await
            .insert(intent.into(), response.into());
    }

    /// Clears the response cache.
    pub async fn clear_cache(&self) {
        self.response_cache.write().await.clear();
        info!("ISO 20022 message cache cleared");
    }

    /// Returns the number of cached responses.
    pub async fn cache_size(&self) -> usize {
        self.response_cache.read().await.len()
    }
}

impl Default for SmartStub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SmartStub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartStub")
            .field("has_provider", &self.provider.is_some())
            .field("cache_responses", &self.cache_responses)
            .finish()
    }
}

/// Picks a template by intent keywords; credit transfer is the default.
fn template_for(intent: &str) -> String {
    let lower = intent.to_lowercase();
    if lower.contains("statement") || lower.contains("camt.053") {
        statement_template()
    } else if lower.contains("settlement") || lower.contains("sese.023") {
        settlement_template()
    } else {
        if !lower.contains("credit transfer") && !lower.contains("pacs.008") {
            warn!(intent, "No template matched, using generic credit transfer");
        }
        credit_transfer_template()
    }
}

fn credit_transfer_template() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pacs.008.001.02">
  <FIToFICstmrCdtTrf>
    <GrpHdr>
      <MsgId>SYNTHEX-MSG-001</MsgId>
      <CreDtTm>2026-01-01T12:00:00</CreDtTm>
      <NbOfTxs>1</NbOfTxs>
      <SttlmInf><SttlmMtd>CLRG</SttlmMtd></SttlmInf>
    </GrpHdr>
    <CdtTrfTxInf>
      <PmtId><InstrId>INSTR-001</InstrId><EndToEndId>E2E-001</EndToEndId></PmtId>
      <Amt><InstdAmt Ccy="USD">1000.00</InstdAmt></Amt>
      <Dbtr><Nm>Synthetic Test Debtor</Nm></Dbtr>
      <Cdtr><Nm>Synthetic Test Creditor</Nm></Cdtr>
    </CdtTrfTxInf>
  </FIToFICstmrCdtTrf>
</Document>
"#
    .to_string()
}

fn statement_template() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <BkToCstmrStmt>
    <GrpHdr><MsgId>SYNTHEX-STMT-001</MsgId></GrpHdr>
    <Stmt>
      <Id>STMT-001</Id>
      <Bal><Tp><CdOrPrtry><Cd>OPBD</Cd></CdOrPrtry></Tp>
        <Amt Ccy="USD">50000.00</Amt></Bal>
    </Stmt>
  </BkToCstmrStmt>
</Document>
"#
    .to_string()
}

fn settlement_template() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:sese.023.001.01">
  <SctiesSttlmTxInstr>
    <TxId>SYNTHEX-STTL-001</TxId>
    <SttlmTpAndAddtlParams>
      <SttlmTp>DVP</SttlmTp>
    </SttlmTpAndAddtlParams>
    <QtyAndAcctDtls>
      <SttlmQty><Qty><Unit>1000</Unit></Qty></SttlmQty>
    </QtyAndAcctDtls>
  </SctiesSttlmTxInstr>
</Document>
"#
    .to_string()
}
