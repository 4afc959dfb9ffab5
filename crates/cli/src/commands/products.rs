//! Product commands: list, add, show, edit, rm.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use rust_decimal::Decimal;

use taskmart_client::{ApiClient, ImageUpload, ProductFilter, ProductStore, format_price};
use taskmart_core::{Product, ProductDraft, ProductId, ProductPatch, ProductStatus, Variations};

use super::{confirm, parse_variation};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products, optionally filtered
    List {
        /// Only show products with this status (`available`, `out_of_stock`, `discontinued`)
        #[arg(short, long)]
        status: Option<ProductStatus>,

        /// Only show products whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a product
    Add {
        /// Product title
        title: String,

        /// List price
        #[arg(short, long)]
        price: Decimal,

        /// Product description
        #[arg(short, long)]
        description: Option<String>,

        /// Discounted price
        #[arg(long)]
        discount: Option<Decimal>,

        /// Stock on hand
        #[arg(long)]
        stock: Option<i64>,

        /// Initial status (defaults to `available`)
        #[arg(short, long)]
        status: Option<ProductStatus>,

        /// Image file to upload; repeat for multiple images
        #[arg(long, value_name = "PATH")]
        image: Vec<PathBuf>,
    },
    /// Show a single product, optionally resolving a variant selection
    Show {
        /// Product id
        id: ProductId,

        /// Variation selection to resolve, e.g. `--var color=Red`;
        /// repeat per variation
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variation)]
        variations: Vec<(String, String)>,
    },
    /// Edit a product's fields
    Edit {
        /// Product id
        id: ProductId,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New list price
        #[arg(short, long)]
        price: Option<Decimal>,

        /// New discounted price
        #[arg(long)]
        discount: Option<Decimal>,

        /// New stock figure
        #[arg(long)]
        stock: Option<i64>,

        /// New status
        #[arg(short, long)]
        status: Option<ProductStatus>,
    },
    /// Delete a product
    Rm {
        /// Product id
        id: ProductId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn dispatch(
    action: ProductAction,
    client: &ApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ProductStore::new(client.products());

    match action {
        ProductAction::List { status, search } => {
            if let Err(err) = store.refresh().await {
                return Err(store_error(&store, err));
            }
            let filter = ProductFilter { status, search };
            let matched = filter.apply(store.products());
            if matched.is_empty() {
                println!("No products");
            }
            for product in matched {
                print_line(product);
            }
        }
        ProductAction::Add {
            title,
            price,
            description,
            discount,
            stock,
            status,
            image,
        } => {
            let mut draft = ProductDraft::new(title, price);
            if let Some(description) = description {
                draft.description = description;
            }
            draft.discount_price = discount;
            draft.stock = stock;
            if let Some(status) = status {
                draft.status = status;
            }

            let result = if image.is_empty() {
                store.create(&draft).await
            } else {
                let images = load_images(&image)?;
                store.create_with_images(&draft, images).await
            };
            let product = match result {
                Ok(product) => product,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Created product {}", product.id);
        }
        ProductAction::Show { id, variations } => {
            let product = match store.get(id).await {
                Ok(product) => product,
                Err(err) => return Err(store_error(&store, err)),
            };
            print_full(&product);
            if !variations.is_empty() {
                let selection: Variations = variations.into_iter().collect();
                print_selection(&product, &selection);
            }
        }
        ProductAction::Edit {
            id,
            title,
            description,
            price,
            discount,
            stock,
            status,
        } => {
            let patch = ProductPatch {
                title,
                description,
                price,
                discount_price: discount,
                status,
                stock,
            };
            let product = match store.patch(id, &patch).await {
                Ok(product) => product,
                Err(err) => return Err(store_error(&store, err)),
            };
            println!("Updated product {}", product.id);
        }
        ProductAction::Rm { id, yes } => {
            if !confirm(&format!("Delete product {id}?"), yes)? {
                return Ok(());
            }
            if let Err(err) = store.delete(id).await {
                return Err(store_error(&store, err));
            }
            println!("Deleted product {id}");
        }
    }
    Ok(())
}

/// Prefer the store's user-facing error string over the raw error.
fn store_error(
    store: &ProductStore,
    err: taskmart_client::StoreError,
) -> Box<dyn std::error::Error> {
    match store.error() {
        Some(message) => message.to_string().into(),
        None => err.into(),
    }
}

/// Read image files into upload payloads, guessing the MIME type from the
/// file extension.
fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageUpload>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            let file_name = path
                .file_name()
                .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
            Ok(ImageUpload {
                content_type: mime_for(path).to_string(),
                file_name,
                bytes,
            })
        })
        .collect()
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_line(product: &Product) {
    let price = format_price(product.effective_price());
    println!(
        "{:>4}  [{}]  {}  {}",
        product.id.as_i64(),
        product.status.label(),
        price,
        product.title
    );
}

fn print_full(product: &Product) {
    println!("Product {}", product.id);
    println!("  Title:       {}", product.title);
    if !product.description.is_empty() {
        println!("  Description: {}", product.description);
    }
    println!("  Price:       {}", format_price(product.price));
    if let Some(discount) = product.discount_price {
        println!("  Discounted:  {}", format_price(discount));
    }
    println!("  Status:      {}", product.status.label());
    if let Some(stock) = product.stock {
        println!("  Stock:       {stock}");
    }
    if let Some(variations) = &product.variations {
        for (name, options) in variations {
            println!("  {name}: {}", options.join(", "));
        }
    }
    if let Some(variants) = &product.variants {
        for variant in variants {
            println!(
                "  Variant:     {}  {}  (stock {})",
                describe_selection(&variant.variation_values),
                format_price(variant.price),
                variant.stock
            );
        }
    }
    for image in &product.images {
        println!("  Image:       {image}");
    }
}

/// Resolve a buyer's selection against the product's variants: the matched
/// variant's price and stock win over the product-level figures.
fn print_selection(product: &Product, selection: &Variations) {
    println!("Selection: {}", describe_selection(selection));
    match product.variant_for(selection) {
        Some(variant) => {
            println!("  Price:       {}", format_price(variant.price));
            println!("  Stock:       {}", variant.stock);
        }
        None => {
            println!("  No variant matches; using product-level figures");
            println!("  Price:       {}", format_price(product.price_for(selection)));
            if let Some(stock) = product.stock {
                println!("  Stock:       {stock}");
            }
        }
    }
}

fn describe_selection(selection: &Variations) -> String {
    selection
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("photo.png")), "image/png");
        assert_eq!(mime_for(Path::new("photo")), "application/octet-stream");
    }
}
