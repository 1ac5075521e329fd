//! Scripted `FuturesExchange` for unit tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use binance_futures::{
    AccountInfo, ExchangeError, FuturesBalance, FuturesExchange, OrderRequest, OrderResponse,
};
use rust_decimal::Decimal;

type Failure = (u16, i64, &'static str);

/// Clones share their call log, so a test can keep one handle while the code
/// under test owns another.
#[derive(Clone, Default)]
pub struct FakeExchange {
    balances: Vec<FuturesBalance>,
    account_failure: Option<Failure>,
    balance_failure: Option<Failure>,
    order_failure: Option<Failure>,
    account_calls: Arc<AtomicUsize>,
    balance_calls: Arc<AtomicUsize>,
    placed: Arc<Mutex<Vec<OrderRequest>>>,
}

impl FakeExchange {
    pub fn with_balances(mut self, balances: Vec<FuturesBalance>) -> Self {
        self.balances = balances;
        self
    }

    pub fn failing_account(mut self, status: u16, code: i64, msg: &'static str) -> Self {
        self.account_failure = Some((status, code, msg));
        self
    }

    pub fn failing_balances(mut self, status: u16, code: i64, msg: &'static str) -> Self {
        self.balance_failure = Some((status, code, msg));
        self
    }

    pub fn failing_orders(mut self, status: u16, code: i64, msg: &'static str) -> Self {
        self.order_failure = Some((status, code, msg));
        self
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    /// Total number of exchange calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.account_calls()
            + self.balance_calls.load(Ordering::SeqCst)
            + self.placed_orders().len()
    }

    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.placed.lock().unwrap().clone()
    }
}

fn api_error((status, code, msg): Failure) -> ExchangeError {
    ExchangeError::Api {
        status,
        code: Some(code),
        message: msg.to_string(),
    }
}

#[async_trait]
impl FuturesExchange for FakeExchange {
    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        match self.account_failure {
            Some(failure) => Err(api_error(failure)),
            None => Ok(AccountInfo {
                can_trade: Some(true),
                total_wallet_balance: Some(Decimal::ONE_HUNDRED),
                available_balance: Some(Decimal::ONE_HUNDRED),
            }),
        }
    }

    async fn balances(&self) -> Result<Vec<FuturesBalance>, ExchangeError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        match self.balance_failure {
            Some(failure) => Err(api_error(failure)),
            None => Ok(self.balances.clone()),
        }
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse, ExchangeError> {
        self.placed.lock().unwrap().push(order.clone());
        if let Some(failure) = self.order_failure {
            return Err(api_error(failure));
        }

        let mut response = OrderResponse::new();
        response.insert("orderId".into(), 4_063_289_921u64.into());
        response.insert("symbol".into(), order.symbol().into());
        response.insert("status".into(), "NEW".into());
        response.insert("side".into(), order.side().as_str().into());
        response.insert("type".into(), order.order_type().wire_name().into());
        response.insert("origQty".into(), order.quantity().to_string().into());
        Ok(response)
    }
}

pub fn balance(asset: &str, amount: &str) -> FuturesBalance {
    FuturesBalance {
        asset: asset.to_string(),
        balance: Decimal::from_str(amount).unwrap(),
        available_balance: None,
        cross_wallet_balance: None,
        update_time: None,
    }
}
