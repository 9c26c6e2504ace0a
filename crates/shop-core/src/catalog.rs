//! # Product Catalog
//!
//! The read-only catalog of sellable items.
//! Loaded once at startup from `config/products.toml` and treated as
//! immutable for the life of the process. Components receive it as an
//! injected `Arc<Catalog>`, never through a global.

use serde::{Deserialize, Serialize};

/// A sellable item in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable product identifier (e.g. "mug-classic")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Unit price in minor currency units (cents)
    pub price: i64,

    /// Image reference (path or URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Whether this product is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a product with the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image: None,
            active: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder: mark inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a sellable product by ID
    ///
    /// Inactive products are invisible here: they cannot be resolved
    /// into an order line or a checkout session.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id && p.active)
    }

    /// All active products, in catalog order
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Number of products (including inactive)
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ignores_inactive() {
        let mut catalog = Catalog::new();
        catalog.add(Product::new("p1", "Product 1", 1200));
        catalog.add(Product::new("p2", "Product 2", 900).inactive());

        assert!(catalog.get("p1").is_some());
        assert!(catalog.get("p2").is_none());
        assert!(catalog.get("ghost").is_none());
        assert_eq!(catalog.active_products().count(), 1);
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [[products]]
            id = "mug-classic"
            name = "Classic Mug"
            description = "A ceramic mug"
            price = 1200
            image = "/images/mug.jpg"

            [[products]]
            id = "poster-a2"
            name = "A2 Poster"
            description = "Matte print"
            price = 1800
            active = false
        "#;

        let catalog = Catalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.len(), 2);

        let mug = catalog.get("mug-classic").unwrap();
        assert_eq!(mug.price, 1200);
        assert_eq!(mug.image.as_deref(), Some("/images/mug.jpg"));

        // Inactive products parse but are not sellable
        assert!(catalog.get("poster-a2").is_none());
    }
}
