use std::io::{self, Write};

use binance_futures::{
    Credentials, FuturesBalance, FuturesExchange, InvalidOrder, Network, OrderRequest,
    OrderResponse, OrderSide, OrderType,
};
use rust_decimal::Decimal;
use structopt::StructOpt;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, warn};

use crate::bot::FuturesBot;
use crate::config;
use crate::logger::Logger;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "futures-bot",
    about = "A simplified CLI trading bot for Binance USDⓈ-M Futures."
)]
pub struct Opt {
    /// Send requests to the production endpoint instead of the testnet
    #[structopt(long)]
    pub mainnet: bool,

    #[structopt(subcommand)]
    pub command: Command,
}

impl Opt {
    pub fn network(&self) -> Network {
        if self.mainnet {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Check API connection and account balance
    Status {
        /// Asset whose balance is printed
        #[structopt(long, default_value = "USDT")]
        asset: String,
    },
    /// Place a new order
    Order(OrderArgs),
}

#[derive(Debug, StructOpt)]
pub struct OrderArgs {
    /// Trading symbol (e.g. BTCUSDT)
    #[structopt(long)]
    pub symbol: String,

    /// Order side
    #[structopt(long, possible_values = &["BUY", "SELL"], case_insensitive = true)]
    pub side: OrderSide,

    /// Order type
    #[structopt(
        long = "type",
        possible_values = &["MARKET", "LIMIT", "STOP_LIMIT"],
        case_insensitive = true
    )]
    pub order_type: OrderType,

    /// Order quantity
    #[structopt(long)]
    pub quantity: Decimal,

    /// Limit price (required for LIMIT and STOP_LIMIT)
    #[structopt(long)]
    pub price: Option<Decimal>,

    /// Stop price (required for STOP_LIMIT)
    #[structopt(long)]
    pub stop_price: Option<Decimal>,

    /// Exit with a non-zero code when the order is not placed
    #[structopt(long)]
    pub strict: bool,
}

impl OrderArgs {
    pub fn to_request(&self) -> Result<OrderRequest, InvalidOrder> {
        OrderRequest::new(
            self.symbol.clone(),
            self.side,
            self.order_type,
            self.quantity,
            self.price,
            self.stop_price,
        )
    }

    pub fn failure_policy(&self) -> OrderFailurePolicy {
        if self.strict {
            OrderFailurePolicy::Fail
        } else {
            OrderFailurePolicy::Ignore
        }
    }
}

/// What a failed order placement does to the exit code. `Ignore` keeps the
/// process successful and only reports the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFailurePolicy {
    #[default]
    Ignore,
    Fail,
}

impl OrderFailurePolicy {
    pub fn exit_code(self, placed: bool) -> u8 {
        match (placed, self) {
            (true, _) | (false, OrderFailurePolicy::Ignore) => EXIT_OK,
            (false, OrderFailurePolicy::Fail) => EXIT_FAILURE,
        }
    }
}

enum Action {
    Status { asset: String },
    Order {
        request: OrderRequest,
        policy: OrderFailurePolicy,
    },
}

/// Runs one command and returns the process exit code.
///
/// Order arguments are validated first, then credentials are read through
/// `lookup`, and only then is `connect` asked for an exchange. Any failure
/// before that point returns without touching the network.
pub async fn run<L, C, E>(
    opt: Opt,
    lookup: L,
    connect: C,
    logger: Logger,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<u8>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(Credentials, Network) -> E,
    E: FuturesExchange,
{
    let action = match &opt.command {
        Command::Status { asset } => Action::Status {
            asset: asset.clone(),
        },
        Command::Order(args) => match args.to_request() {
            Ok(request) => Action::Order {
                request,
                policy: args.failure_policy(),
            },
            Err(e) => {
                writeln!(err, "error: {e}\n\nFor more information try --help")?;
                return Ok(EXIT_USAGE);
            }
        },
    };

    let network = opt.network();
    let dispatch = logger.dispatch().clone();

    let bot = async {
        let credentials = match config::load_credentials(&lookup) {
            Ok(credentials) => credentials,
            Err(e) => {
                error!("{}. Exiting.", e);
                return None;
            }
        };

        if network == Network::Mainnet {
            warn!("Running against the PRODUCTION futures endpoint.");
        }
        info!(
            "Client configured for Futures {}: {}",
            network,
            network.base_url()
        );

        match FuturesBot::connect(connect(credentials, network), logger.clone()).await {
            Ok(bot) => Some(bot),
            Err(e) => {
                error!(
                    "Failed to initialize bot ({}). Please check connection and credentials.",
                    e
                );
                None
            }
        }
    }
    .with_subscriber(dispatch)
    .await;

    let Some(bot) = bot else {
        return Ok(EXIT_FAILURE);
    };

    match action {
        Action::Status { asset } => {
            writeln!(out, "\n--- Account Status ---")?;
            let balance = bot.get_account_balance(&asset).await;
            render_balance(out, &asset, balance.as_ref())?;
            writeln!(out, "----------------------\n")?;
            Ok(EXIT_OK)
        }
        Action::Order { request, policy } => {
            writeln!(out, "\n--- Placing Order ---")?;
            let result = bot.place_order(&request).await;
            render_order_result(out, result.as_ref())?;
            Ok(policy.exit_code(result.is_some()))
        }
    }
}

pub fn render_balance(
    out: &mut dyn Write,
    asset: &str,
    balance: Option<&FuturesBalance>,
) -> io::Result<()> {
    match balance {
        Some(b) => {
            writeln!(out, "Asset:     {}", b.asset)?;
            writeln!(out, "Balance:   {}", b.balance)?;
            if let Some(available) = b.available_balance {
                writeln!(out, "Available: {}", available)?;
            }
        }
        None => writeln!(out, "Asset {asset} not found in account balance.")?,
    }
    Ok(())
}

pub fn render_order_result(
    out: &mut dyn Write,
    result: Option<&OrderResponse>,
) -> io::Result<()> {
    match result {
        Some(order) => {
            writeln!(out, "✅ Order placed successfully!")?;
            writeln!(out, "\n--- Order Details ---")?;
            let pretty = serde_json::to_string_pretty(order).map_err(io::Error::other)?;
            writeln!(out, "{pretty}")?;
            writeln!(out, "---------------------\n")?;
        }
        None => writeln!(out, "❌ Order placement failed. Check logs for details.")?,
    }
    Ok(())
}
