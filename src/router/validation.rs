// Request validation module
// Validates routing requests against the catalog before any quote call is made
//
// Numan Thabit 2025 Nov

use tracing::debug;

use crate::amount::{parse_base_units, validate_slippage};
use crate::catalog::{is_evm_address, Token, TokenCatalog};
use crate::errors::RouteError;
use crate::router::request::{ResolvedRequest, RoutingRequest, RoutingSettings};

/// Accumulates every problem found in a request.
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn into_result(self) -> Result<(), RouteError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(RouteError::InvalidRequest(self.errors.join("; ")))
        }
    }
}

/// Validate a request and resolve it against the catalog.
pub fn validate_request(
    catalog: &TokenCatalog,
    req: &RoutingRequest,
    settings: &RoutingSettings,
) -> Result<ResolvedRequest, RouteError> {
    let chain_id = req.chain_id;
    if !catalog.supports_chain(chain_id) {
        return Err(RouteError::InvalidRequest(format!(
            "unsupported chain {chain_id}"
        )));
    }

    let mut result = ValidationResult::new();

    let from = resolve_token(catalog, "fromToken", &req.from_token, chain_id, &mut result);
    let to = resolve_token(catalog, "toToken", &req.to_token, chain_id, &mut result);
    if let (Some(from), Some(to)) = (&from, &to) {
        if from.same_address(to) {
            result.add_error(format!(
                "fromToken and toToken are the same asset ({})",
                from.symbol
            ));
        }
    }

    let amount_in = match parse_base_units(&req.from_amount) {
        Ok(amount) => Some(amount),
        Err(e) => {
            result.add_error(format!("fromAmount: {e}"));
            None
        }
    };

    if !is_evm_address(req.from_address.trim()) {
        result.add_error(format!("fromAddress {:?} is not a valid address", req.from_address));
    }

    let slippage = match validate_slippage(req.slippage.unwrap_or(settings.default_slippage)) {
        Ok(s) => s,
        Err(e) => {
            result.add_error(e.to_string());
            settings.default_slippage
        }
    };

    let max_hops = req.max_hops.unwrap_or(settings.default_max_hops);
    if max_hops == 0 {
        result.add_error("maxHops must be at least 1".to_string());
    }

    result.into_result()?;

    match (from, to, amount_in) {
        (Some(from), Some(to), Some(amount_in)) => {
            debug!(
                from = %from.symbol,
                to = %to.symbol,
                chain_id = chain_id,
                max_hops = max_hops,
                "request validated"
            );
            Ok(ResolvedRequest {
                from,
                to,
                amount_in,
                from_address: req.from_address.trim().to_string(),
                chain_id,
                slippage,
                max_hops,
            })
        }
        _ => Err(RouteError::InvalidRequest("incomplete request".to_string())),
    }
}

fn resolve_token(
    catalog: &TokenCatalog,
    field: &str,
    input: &str,
    chain_id: u64,
    result: &mut ValidationResult,
) -> Option<Token> {
    if input.trim().is_empty() {
        result.add_error(format!("{field} is empty"));
        return None;
    }
    let token = catalog.lookup(input, chain_id);
    if token.is_none() {
        result.add_error(format!(
            "{field} {input:?} is not defined on chain {chain_id}"
        ));
    }
    token
}
