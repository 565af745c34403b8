//! # Commands
//!
//! One module per area of the app. Each command takes the [`App`] it runs
//! against and returns a [`Rendered`] view.
//!
//! ```text
//! tavola login / signup / logout / profile   ──► auth
//! tavola restaurants list|show|menu|search   ──► restaurants
//! tavola cuisines                            ──► restaurants
//! tavola cart show|add|remove|set|clear      ──► cart
//! tavola checkout                            ──► checkout
//! tavola orders list|show|rate               ──► orders
//! tavola config show|init                    ──► config (no App needed)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod restaurants;

use clap::Subcommand;
use tavola_core::PaymentMethod;

use crate::error::CliResult;
use crate::render::Rendered;
use crate::App;

pub use restaurants::ListArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        email: String,

        #[arg(long, env = "TAVOLA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Signup(auth::SignupArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in customer
    Profile,

    /// Browse restaurants
    #[command(subcommand)]
    Restaurants(RestaurantsCommand),

    /// List cuisines, for one restaurant or all of them
    Cuisines {
        #[arg(long)]
        restaurant: Option<String>,
    },

    /// Inspect or edit the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Place an order for everything in the cart
    Checkout {
        /// `card` or `cash_on_delivery`
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },

    /// Order history and ratings
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Show or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum RestaurantsCommand {
    /// One page of restaurants with filters, sort and paging
    List(ListArgs),

    /// Details and menu of one restaurant
    Show { id: String },

    /// Menu of one restaurant
    Menu { id: String },

    /// Search restaurants by name
    Search { query: String },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    Show,

    /// Add one of a menu item
    Add {
        restaurant_id: String,
        menu_item_id: String,
    },

    /// Remove one of a menu item
    Remove { menu_item_id: String },

    /// Set the quantity of a line; 0 removes it
    Set { menu_item_id: String, quantity: u32 },

    Clear,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    List,

    Show { id: String },

    /// Rate a delivered order from 1 to 5 stars
    Rate {
        id: String,

        #[arg(long)]
        stars: u8,

        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigCommand {
    Show,

    /// Write the current settings to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Runs a command that needs the full app.
pub async fn dispatch(app: &App, command: Command) -> CliResult<Rendered> {
    match command {
        Command::Login { email, password } => auth::login(app, &email, &password).await,
        Command::Signup(args) => auth::signup(app, args).await,
        Command::Logout => auth::logout(app).await,
        Command::Profile => auth::profile(app).await,

        Command::Restaurants(cmd) => match cmd {
            RestaurantsCommand::List(args) => restaurants::list(app, args).await,
            RestaurantsCommand::Show { id } => restaurants::show(app, &id).await,
            RestaurantsCommand::Menu { id } => restaurants::menu(app, &id).await,
            RestaurantsCommand::Search { query } => restaurants::search(app, &query).await,
        },
        Command::Cuisines { restaurant } => restaurants::cuisines(app, restaurant.as_deref()).await,

        Command::Cart(cmd) => match cmd {
            CartCommand::Show => cart::show(app),
            CartCommand::Add {
                restaurant_id,
                menu_item_id,
            } => cart::add(app, &restaurant_id, &menu_item_id).await,
            CartCommand::Remove { menu_item_id } => cart::remove(app, &menu_item_id).await,
            CartCommand::Set {
                menu_item_id,
                quantity,
            } => cart::set(app, &menu_item_id, quantity).await,
            CartCommand::Clear => cart::clear(app).await,
        },

        Command::Checkout { payment } => checkout::checkout(app, payment).await,

        Command::Orders(cmd) => match cmd {
            OrdersCommand::List => orders::list(app).await,
            OrdersCommand::Show { id } => orders::show(app, &id).await,
            OrdersCommand::Rate { id, stars, comment } => {
                orders::rate(app, &id, stars, comment.as_deref()).await
            }
        },

        Command::Config(cmd) => config::run(&app.config, cmd),
    }
}
