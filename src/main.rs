use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use repairdesk::backend::{AuthService, AuthSession, BackendError, FirestoreClient, IdentityClient, OrderStore};
use repairdesk::config::{BackendConfig, ConfigError};
use repairdesk::model::OrderStatus;
use repairdesk::screens::order_details::Card;
use repairdesk::screens::{
    EffectSink, OrderDetailsScreen, OrderDetailsView, OrdersScreen, OrdersState, OrdersView, SignInScreen, UiEffect,
};
use repairdesk::shell::{NavigationShell, Route};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("backend client setup failed: {0}")]
    Backend(#[from] BackendError),
    #[error("sign-in failed")]
    SignInFailed,
    #[error("could not load service orders")]
    ListFailed,
    #[error("could not load service order {0}")]
    LoadFailed(String),
    #[error("service order {0} is already closed")]
    AlreadyClosed(String),
    #[error("service order {0} was not closed")]
    CloseFailed(String),
}

#[derive(Parser, Debug)]
#[command(name = "repairdesk", about = "Equipment repair service orders")]
struct Cli {
    #[arg(long, env = "REPAIRDESK_EMAIL", default_value = "")]
    email: String,

    #[arg(long, env = "REPAIRDESK_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the credentials and print the signed-in account.
    SignIn,
    Orders(OrdersCommand),
}

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    List {
        #[arg(long, default_value = "open")]
        status: OrderStatus,
    },
    Show {
        order_id: String,
    },
    Close {
        order_id: String,
        #[arg(long)]
        solution: String,
    },
}

/// Terminal host: owns the backend clients, the shell, and the effect channel.
struct App {
    config: BackendConfig,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn OrderStore>,
    shell: NavigationShell,
    effects: EffectSink,
    rx: UnboundedReceiver<UiEffect>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BackendConfig::from_env()?;
    let mut app = App::new(config)?;

    app.sign_in(&cli.email, &cli.password).await?;

    match cli.command {
        Command::SignIn => {
            let session = app.auth.session().current();
            if let Some(user) = session.user() {
                println!("signed in as {} ({})", user.email, user.uid);
            }
            Ok(())
        }
        Command::Orders(orders) => match orders.command {
            OrdersSubcommand::List { status } => app.list(status).await,
            OrdersSubcommand::Show { order_id } => app.show(&order_id).await,
            OrdersSubcommand::Close { order_id, solution } => app.close(&order_id, &solution).await,
        },
    }
}

impl App {
    fn new(config: BackendConfig) -> Result<Self, CliError> {
        let session = AuthSession::new();
        let auth = Arc::new(IdentityClient::new(&config, session.clone())?);
        let store = Arc::new(FirestoreClient::new(&config, session.clone())?);
        let shell = NavigationShell::new(&session);
        let (effects, rx) = EffectSink::channel();
        Ok(Self { config, auth, store, shell, effects, rx })
    }

    /// Print pending alerts and feed navigation effects to the shell.
    fn pump(&mut self) {
        while let Ok(effect) = self.rx.try_recv() {
            if let UiEffect::Alert(alert) = &effect {
                eprintln!("[{}] {}", alert.title, alert.message);
            }
            self.shell.apply(&effect);
        }
    }

    async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), CliError> {
        let mut screen = SignInScreen::new(Arc::clone(&self.auth), self.effects.clone());
        screen.set_email(email);
        screen.set_password(password);
        screen.submit().await;
        drop(screen);
        self.pump();

        self.shell.sync_auth();
        if *self.shell.current() == Route::Orders {
            Ok(())
        } else {
            Err(CliError::SignInFailed)
        }
    }

    fn orders_screen(&self) -> OrdersScreen {
        OrdersScreen::new(
            Arc::clone(&self.auth),
            Arc::clone(&self.store),
            self.effects.clone(),
            self.config.display_offset,
        )
    }

    async fn list(&mut self, status: OrderStatus) -> Result<(), CliError> {
        let mut screen = self.orders_screen();
        if status == OrderStatus::Open {
            screen.mount().await;
        } else {
            screen.select_filter(status).await;
        }
        self.pump();

        let view = screen.view();
        if matches!(view.state, OrdersState::Failed(_)) {
            return Err(CliError::ListFailed);
        }
        print_orders(&view);
        Ok(())
    }

    /// Navigate from the list into the details screen for `order_id` and load it.
    async fn open_details(&mut self, order_id: &str) -> Result<OrderDetailsScreen, CliError> {
        self.orders_screen().open(order_id);
        self.pump();

        let Route::OrderDetails { order_id } = self.shell.current().clone() else {
            return Err(CliError::LoadFailed(order_id.to_owned()));
        };
        let mut screen = OrderDetailsScreen::new(
            Arc::clone(&self.store),
            self.effects.clone(),
            order_id.clone(),
            self.config.display_offset,
        );
        screen.mount().await;
        self.pump();

        if matches!(screen.view(), OrderDetailsView::Failed { .. }) {
            return Err(CliError::LoadFailed(order_id));
        }
        Ok(screen)
    }

    async fn show(&mut self, order_id: &str) -> Result<(), CliError> {
        let screen = self.open_details(order_id).await?;
        print_details(&screen.view());
        Ok(())
    }

    async fn close(&mut self, order_id: &str, solution: &str) -> Result<(), CliError> {
        let mut screen = self.open_details(order_id).await?;
        if !matches!(screen.view(), OrderDetailsView::Loaded { close_button: true, .. }) {
            return Err(CliError::AlreadyClosed(order_id.to_owned()));
        }

        screen.set_solution(solution);
        screen.close().await;
        self.pump();

        if *self.shell.current() == Route::Orders {
            println!("closed {order_id}");
            Ok(())
        } else {
            Err(CliError::CloseFailed(order_id.to_owned()))
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn print_orders(view: &OrdersView) {
    let OrdersState::Loaded(rows) = &view.state else {
        return;
    };
    println!("{} orders: {}", view.filter, rows.len());
    for row in rows {
        println!("{:<24} patrimony {:<12} {}", row.id, row.patrimony, row.when);
    }
}

fn print_details(view: &OrderDetailsView) {
    let OrderDetailsView::Loaded { status_label, equipment, problem, solution, .. } = view else {
        return;
    };
    println!("status: {status_label}");
    for card in [equipment, problem, solution] {
        print_card(card);
    }
}

fn print_card(card: &Card) {
    println!();
    println!("{}", card.title.to_uppercase());
    if !card.description.is_empty() {
        println!("  {}", card.description);
    }
    if let Some(footer) = &card.footer {
        println!("  {footer}");
    }
}
