//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::diagnostics::{collect_diagnostics, to_lsp_range};
use crate::features::document_symbols::{collect_document_symbols, HyperqlDocumentSymbol};
use crate::features::folding_ranges::{
    folding_ranges as collect_folding_ranges, HyperqlFoldingRange,
};
use crate::features::hover::{hover as compute_hover, HoverResult};
use crate::features::semantic_tokens::{
    collect_semantic_tokens, HyperqlSemanticToken, SEMANTIC_TOKEN_KINDS,
};
use hyperql_config::{load_defaults, LspConfig};
use hyperql_parser::{InputEdit, ParseStats, Parser, Position as SourcePosition, Tree};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    Diagnostic, DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, FoldingRange,
    FoldingRangeParams, FoldingRangeProviderCapability, Hover, HoverContents, HoverParams,
    HoverProviderCapability, InitializeParams, InitializeResult, InitializedParams,
    MarkupContent, MarkupKind, OneOf, Position, SemanticToken, SemanticTokenType, SemanticTokens,
    SemanticTokensFullOptions, SemanticTokensLegend, SemanticTokensOptions, SemanticTokensParams,
    SemanticTokensResult, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;

/// The editor side of the connection, as far as the server pushes to it.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, tree: &Tree) -> Vec<HyperqlSemanticToken>;
    fn document_symbols(&self, tree: &Tree, source: &str) -> Vec<HyperqlDocumentSymbol>;
    fn folding_ranges(&self, tree: &Tree) -> Vec<HyperqlFoldingRange>;
    fn hover(&self, tree: &Tree, source: &str, position: SourcePosition) -> Option<HoverResult>;
    fn diagnostics(&self, tree: &Tree, source: &str) -> Vec<Diagnostic>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, tree: &Tree) -> Vec<HyperqlSemanticToken> {
        collect_semantic_tokens(tree)
    }

    fn document_symbols(&self, tree: &Tree, source: &str) -> Vec<HyperqlDocumentSymbol> {
        collect_document_symbols(tree, source)
    }

    fn folding_ranges(&self, tree: &Tree) -> Vec<HyperqlFoldingRange> {
        collect_folding_ranges(tree)
    }

    fn hover(&self, tree: &Tree, source: &str, position: SourcePosition) -> Option<HoverResult> {
        compute_hover(tree, source, position)
    }

    fn diagnostics(&self, tree: &Tree, source: &str) -> Vec<Diagnostic> {
        collect_diagnostics(tree, source)
    }
}

#[derive(Clone)]
struct DocumentEntry {
    tree: Arc<Tree>,
    text: Arc<String>,
    stats: ParseStats,
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, DocumentEntry>>,
}

impl DocumentStore {
    /// Parse `text` for `uri`, reusing the statements of the stored tree that the change
    /// left alone.
    async fn upsert(&self, uri: Url, text: String) -> DocumentEntry {
        let mut entries = self.entries.write().await;
        let mut parser = Parser::new();

        let tree = match entries.get(&uri) {
            Some(previous) => match InputEdit::between(&previous.text, &text) {
                Some(edit) => {
                    let mut old_tree = Tree::clone(&previous.tree);
                    old_tree.edit(&edit);
                    parser.parse(&text, Some(&old_tree))
                }
                None => Tree::clone(&previous.tree),
            },
            None => parser.parse(&text, None),
        };

        let entry = DocumentEntry {
            tree: Arc::new(tree),
            text: Arc::new(text),
            stats: parser.stats(),
        };
        entries.insert(uri, entry.clone());
        entry
    }

    async fn get(&self, uri: &Url) -> Option<DocumentEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: SEMANTIC_TOKEN_KINDS
            .iter()
            .map(|kind| SemanticTokenType::new(kind.as_str()))
            .collect(),
        token_modifiers: Vec::new(),
    }
}

pub struct HyperqlLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
    config: LspConfig,
}

impl HyperqlLanguageServer<Client, DefaultFeatureProvider> {
    /// A server with the built-in feature switches.
    pub fn new(client: Client) -> Self {
        let config = load_defaults().map(|config| config.lsp).unwrap_or_default();
        Self::with_config(client, config)
    }

    pub fn with_config(client: Client, config: LspConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> HyperqlLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: LspConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
            config,
        }
    }

    async fn parse_and_store(&self, uri: Url, text: String, version: Option<i32>) {
        let entry = self.documents.upsert(uri.clone(), text).await;
        tracing::debug!(
            %uri,
            reused = entry.stats.reused,
            parsed = entry.stats.parsed,
            "document updated"
        );
        if self.config.diagnostics {
            let diagnostics = self.features.diagnostics(&entry.tree, &entry.text);
            self.client.publish_diagnostics(uri, diagnostics, version).await;
        }
    }

    async fn document_entry(&self, uri: &Url) -> Option<DocumentEntry> {
        self.documents.get(uri).await
    }
}

fn from_lsp_position(position: Position) -> SourcePosition {
    SourcePosition::new(position.line as usize, position.character as usize)
}

fn encode_semantic_tokens(tokens: &[HyperqlSemanticToken], text: &str) -> Vec<SemanticToken> {
    let line_offsets = compute_line_offsets(text);
    let mut data = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in tokens {
        let token_type_index = SEMANTIC_TOKEN_KINDS
            .iter()
            .position(|kind| *kind == token.kind)
            .unwrap_or(0) as u32;
        for (line, start, length) in split_token_on_lines(token, text, &line_offsets) {
            if length == 0 {
                continue;
            }
            let delta_line = line.saturating_sub(prev_line);
            let delta_start = if delta_line == 0 {
                start.saturating_sub(prev_start)
            } else {
                start
            };
            data.push(SemanticToken {
                delta_line,
                delta_start,
                length,
                token_type: token_type_index,
                token_modifiers_bitset: 0,
            });
            prev_line = line;
            prev_start = start;
        }
    }

    data
}

fn compute_line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            offsets.push(idx + ch.len_utf8());
        }
    }
    offsets
}

/// Expand a token range into `(line, column, length)` slices, one per line it covers.
/// Block comments are the only tokens that span lines.
fn split_token_on_lines(
    token: &HyperqlSemanticToken,
    text: &str,
    line_offsets: &[usize],
) -> Vec<(u32, u32, u32)> {
    let Some(slice) = text.get(token.range.span.clone()) else {
        return Vec::new();
    };
    let mut segments = Vec::new();
    let mut current_line = token.range.start.line as u32;
    let mut segment_start = 0;
    let base_offset = token.range.span.start;

    let mut push_segment = |line: u32, from: usize, to: usize| {
        let absolute_start = base_offset + from;
        let line_offset = line_offsets.get(line as usize).copied().unwrap_or(0);
        let start_col = absolute_start.saturating_sub(line_offset) as u32;
        segments.push((line, start_col, (to - from) as u32));
    };

    for (idx, ch) in slice.char_indices() {
        if ch == '\n' {
            if idx > segment_start {
                push_segment(current_line, segment_start, idx);
            }
            current_line += 1;
            segment_start = idx + ch.len_utf8();
        }
    }

    if slice.len() > segment_start {
        push_segment(current_line, segment_start, slice.len());
    }

    segments
}

#[allow(deprecated)]
fn to_document_symbol(symbol: &HyperqlDocumentSymbol) -> DocumentSymbol {
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range: to_lsp_range(&symbol.range),
        selection_range: to_lsp_range(&symbol.selection_range),
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(symbol.children.iter().map(to_document_symbol).collect())
        },
        tags: None,
    }
}

fn to_lsp_folding_range(range: &HyperqlFoldingRange) -> FoldingRange {
    FoldingRange {
        start_line: range.start_line,
        start_character: range.start_character,
        end_line: range.end_line,
        end_character: range.end_character,
        kind: range.kind.clone(),
        collapsed_text: None,
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for HyperqlLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let config = &self.config;
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: config
                .hover
                .then_some(HoverProviderCapability::Simple(true)),
            document_symbol_provider: config.document_symbols.then_some(OneOf::Left(true)),
            folding_range_provider: config
                .folding_ranges
                .then_some(FoldingRangeProviderCapability::Simple(true)),
            semantic_tokens_provider: config.semantic_tokens.then(|| {
                lsp_types::SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        work_done_progress_options: WorkDoneProgressOptions::default(),
                        legend: semantic_tokens_legend(),
                        range: None,
                        full: Some(SemanticTokensFullOptions::Bool(true)),
                    },
                )
            }),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "hyperql-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("hyperql-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        self.parse_and_store(uri, text, Some(version)).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            let document = params.text_document;
            self.parse_and_store(document.uri, change.text, Some(document.version))
                .await;
        }
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri).await;
        if self.config.diagnostics {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        if !self.config.semantic_tokens {
            return Ok(None);
        }
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let tokens = self.features.semantic_tokens(&entry.tree);
            let data = encode_semantic_tokens(&tokens, entry.text.as_str());
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data,
            })))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        if !self.config.document_symbols {
            return Ok(None);
        }
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let symbols = self.features.document_symbols(&entry.tree, &entry.text);
            let converted: Vec<DocumentSymbol> = symbols.iter().map(to_document_symbol).collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        if !self.config.hover {
            return Ok(None);
        }
        let position = params.text_document_position_params;
        if let Some(entry) = self.document_entry(&position.text_document.uri).await {
            let position = from_lsp_position(position.position);
            if let Some(result) = self.features.hover(&entry.tree, &entry.text, position) {
                return Ok(Some(Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: result.contents,
                    }),
                    range: Some(to_lsp_range(&result.range)),
                }));
            }
        }
        Ok(None)
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        if !self.config.folding_ranges {
            return Ok(None);
        }
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let ranges = self.features.folding_ranges(&entry.tree);
            Ok(Some(ranges.iter().map(to_lsp_folding_range).collect()))
        } else {
            Ok(None)
        }
    }
}
