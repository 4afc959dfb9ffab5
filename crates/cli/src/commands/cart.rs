//! Cart commands: show, add, update, rm, clear.

use clap::Subcommand;

use taskmart_client::{ApiClient, CartStore, format_price};
use taskmart_core::{CartItem, CartItemId, ProductId, Variations};

use super::{confirm, parse_variation};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Variation selection, e.g. `--var color=Red`; repeat per variation
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variation)]
        variations: Vec<(String, String)>,
    },
    /// Change a cart line's quantity
    Update {
        /// Cart item id
        id: CartItemId,

        /// New quantity
        #[arg(short, long)]
        qty: u32,
    },
    /// Remove a cart line
    Rm {
        /// Cart item id
        id: CartItemId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn dispatch(
    action: CartAction,
    client: &ApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CartStore::new(client.cart());

    match action {
        CartAction::Show => {
            if let Err(err) = store.refresh().await {
                return Err(store_error(&store, err));
            }
            if store.items().is_empty() {
                println!("Cart is empty");
                return Ok(());
            }
            for item in store.items() {
                print_line(item);
            }
            println!("Items: {}", store.count());
            println!("Total: {}", format_price(store.total()));
        }
        CartAction::Add {
            product_id,
            qty,
            variations,
        } => {
            let variations: Variations = variations.into_iter().collect();
            let item = match store.add_to_cart(product_id, qty, variations).await {
                Ok(item) => item,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Added {} x product {} to cart", item.quantity, product_id);
            warn_if_over_stock(&item);
        }
        CartAction::Update { id, qty } => {
            let item = match store.update_item(id, qty).await {
                Ok(item) => item,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Cart item {} now has quantity {}", id, item.quantity);
            warn_if_over_stock(&item);
        }
        CartAction::Rm { id, yes } => {
            if !confirm(&format!("Remove cart item {id}?"), yes)? {
                return Ok(());
            }
            if let Err(err) = store.remove_item(id).await {
                return Err(store_error(&store, err));
            }
            println!("Removed cart item {id}");
        }
        CartAction::Clear { yes } => {
            if !confirm("Empty the cart?", yes)? {
                return Ok(());
            }
            if let Err(err) = store.clear().await {
                return Err(store_error(&store, err));
            }
            println!("Cart cleared");
        }
    }
    Ok(())
}

/// The backend accepts quantities above the available stock; surface it as
/// a warning when the embedded snapshot shows one. The matched variant's
/// stock wins over the product-level figure.
fn warn_if_over_stock(item: &CartItem) {
    let Some(stock) = item.available_stock() else {
        return;
    };
    if i64::from(item.quantity) > stock {
        eprintln!(
            "Warning: quantity {} exceeds available stock ({stock})",
            item.quantity
        );
    }
}

fn store_error(store: &CartStore, err: taskmart_client::ApiError) -> Box<dyn std::error::Error> {
    match store.error() {
        Some(message) => message.to_string().into(),
        None => err.into(),
    }
}

fn print_line(item: &CartItem) {
    let title = item
        .product
        .as_ref()
        .map_or("(product unavailable)", |product| product.title.as_str());
    let mut line = format!(
        "{:>4}  {} x {}  {}",
        item.id.as_i64(),
        item.quantity,
        title,
        format_price(item.line_total())
    );
    if !item.variations.is_empty() {
        let selection: Vec<String> = item
            .variations
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        line.push_str(&format!("  [{}]", selection.join(", ")));
    }
    println!("{line}");
}
