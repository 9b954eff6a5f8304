use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use seq_core::{MIN_QUERY_TERMS, Prediction, Predictor, SearchConfig, Sequence, Term};
use serde::Deserialize;

#[derive(Clone)]
pub struct SeqServer {
    predictor: Predictor<'static>,
    tool_router: ToolRouter<Self>,
}

impl SeqServer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            predictor: Predictor::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Predictor for one call, with an optional per-request depth limit.
    fn predictor_for(&self, depth_limit: Option<u32>) -> Predictor<'static> {
        match depth_limit {
            Some(depth_limit) => Predictor::new(SearchConfig {
                depth_limit,
                ..self.predictor.config().clone()
            }),
            None => self.predictor.clone(),
        }
    }

    fn prediction_json(seq: &Sequence, prediction: &Prediction) -> serde_json::Value {
        serde_json::json!({
            "sequence": seq,
            "value": prediction.value,
            "depth": prediction.depth,
            "strategy": prediction.strategy,
            "matched": prediction.matched.as_ref().map(|m| serde_json::json!({
                "name": m.entry.name,
                "origin": m.origin,
                "size": m.size,
            })),
            "explanation": prediction.explanation.to_string(),
        })
    }
}

fn to_query(terms: Vec<Term>) -> Result<Sequence, McpError> {
    let seq = Sequence::from(terms);
    seq.require_len(MIN_QUERY_TERMS)
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
    Ok(seq)
}

fn json_result(value: &serde_json::Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct PredictRequest {
    /// Known terms of the sequence, oldest first. At least two are required.
    terms: Vec<Term>,
    /// Optional recursion budget overriding the server default
    depth_limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BatchPredictRequest {
    /// Sequences to predict independently of each other
    sequences: Vec<Vec<Term>>,
    /// Optional recursion budget applied to every sequence
    depth_limit: Option<u32>,
}

#[tool_router]
impl SeqServer {
    #[tool(
        description = "Predict the next term of an integer sequence. Returns the predicted value (null when no explanation was found), the winning strategy and its depth, and a nested explanation of how the answer was derived (differences, ratios, alternation, signs, division/remainder pairs, or a match against a well-known sequence)."
    )]
    async fn predict_next(
        &self,
        Parameters(req): Parameters<PredictRequest>,
    ) -> Result<CallToolResult, McpError> {
        let seq = to_query(req.terms)?;
        let predictor = self.predictor_for(req.depth_limit);

        let (seq, prediction) = tokio::task::spawn_blocking(move || {
            let prediction = predictor.predict(&seq);
            (seq, prediction)
        })
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(json_result(&Self::prediction_json(&seq, &prediction)))
    }

    #[tool(
        description = "Predict the next term of several integer sequences in one call. Each sequence is searched on its own, nothing learned from one carries over to another. Every sequence needs at least two terms."
    )]
    async fn predict_batch(
        &self,
        Parameters(req): Parameters<BatchPredictRequest>,
    ) -> Result<CallToolResult, McpError> {
        let sequences = req
            .sequences
            .into_iter()
            .map(to_query)
            .collect::<Result<Vec<_>, _>>()?;
        let predictor = self.predictor_for(req.depth_limit);

        let (sequences, predictions) = tokio::task::spawn_blocking(move || {
            let predictions = predictor.predict_batch(&sequences);
            (sequences, predictions)
        })
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let results: Vec<serde_json::Value> = sequences
            .iter()
            .zip(&predictions)
            .map(|(seq, p)| Self::prediction_json(seq, p))
            .collect();
        let result = serde_json::json!({
            "results": results,
            "batch_size": results.len(),
            "answered": predictions.iter().filter(|p| p.value.is_some()).count(),
        });

        Ok(json_result(&result))
    }

    #[tool(
        description = "List the well-known sequences the predictor can recognise, with their terms and how many consecutive terms must line up before a match is trusted."
    )]
    async fn list_catalog(&self) -> Result<CallToolResult, McpError> {
        let entries: Vec<serde_json::Value> = self
            .predictor
            .catalog()
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "name": entry.name,
                    "terms": entry.terms,
                    "familiarity": entry.familiarity,
                })
            })
            .collect();

        Ok(json_result(&serde_json::json!({
            "count": entries.len(),
            "entries": entries,
        })))
    }
}

#[tool_handler]
impl ServerHandler for SeqServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Next-term prediction for integer sequences.\n\n\
                 - predict_next: give the known terms (at least two) and get the next one, \
                   with an explanation tree showing which transformation explained the sequence.\n\
                 - predict_batch: same, for several unrelated sequences at once.\n\
                 - list_catalog: the well-known sequences used for matching.\n\n\
                 A null value means no explanation was found within the depth limit; \
                 do not guess a number in that case."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
