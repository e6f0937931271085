use serde::{Deserialize, Serialize};

use crate::domain::types::{NetworkCode, ProductName, TypeConstraintError};

/// An editorial product content can be scheduled for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDefinition {
    pub name: ProductName,
    /// The custom title names the featured person rather than the piece.
    pub needs_person: bool,
}

impl ProductDefinition {
    /// Label for the custom title field of this product.
    pub fn title_label(&self) -> &'static str {
        if self.needs_person {
            "Nombre de la persona"
        } else {
            "Título personalizado"
        }
    }
}

/// A social network content can be published on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub name: String,
    pub code: NetworkCode,
}

/// Products and networks known to the editorial team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductDefinition>,
    pub networks: Vec<NetworkDefinition>,
}

const PRODUCTS: &[(&str, bool)] = &[
    ("Reacción a la noticia", true),
    ("Entre Líneas", false),
    ("La Cocina", false),
    ("Hilando Ideas", false),
    ("Revista ÁTOMO", false),
    ("Crítica & Política", false),
    ("Perspectiva Z", false),
    ("Efemérides FPP", false),
    ("Carrusel FPP", false),
    ("Extractos", true),
    ("Editorial FPP", false),
    ("Merchandising FPP", false),
    ("Ciclo de Cine", false),
    ("Oferta laboral", false),
    ("En Simple", false),
    ("Entrevistas FPP", true),
    ("Otros", false),
    ("FPP Valdivia", false),
    ("FPP Santiago", false),
    ("FPP Valparaíso", false),
    ("FPP Concepción", false),
    ("Formación", true),
    ("Opinión", true),
];

const NETWORKS: &[(&str, &str)] = &[
    ("Instagram", "IG"),
    ("Facebook", "FB"),
    ("TikTok", "TT"),
    ("LinkedIn", "LI"),
    ("Twitter", "TW"),
    ("YouTube", "YT"),
    ("WhatsApp", "WA"),
];

impl Default for Catalog {
    fn default() -> Self {
        let products = PRODUCTS
            .iter()
            .filter_map(|(name, needs_person)| {
                ProductName::new(*name).ok().map(|name| ProductDefinition {
                    name,
                    needs_person: *needs_person,
                })
            })
            .collect();
        let networks = NETWORKS
            .iter()
            .filter_map(|(name, code)| {
                NetworkCode::new(*code).ok().map(|code| NetworkDefinition {
                    name: (*name).to_string(),
                    code,
                })
            })
            .collect();
        Self { products, networks }
    }
}

impl Catalog {
    pub fn product(&self, name: &ProductName) -> Option<&ProductDefinition> {
        self.products.iter().find(|p| &p.name == name)
    }

    pub fn network(&self, code: &NetworkCode) -> Option<&NetworkDefinition> {
        self.networks.iter().find(|n| &n.code == code)
    }

    pub fn network_codes(&self) -> Vec<NetworkCode> {
        self.networks.iter().map(|n| n.code.clone()).collect()
    }

    /// Checks that the product and every network belong to the catalog.
    pub fn check(
        &self,
        product: &ProductName,
        networks: &[NetworkCode],
    ) -> Result<(), TypeConstraintError> {
        if self.product(product).is_none() {
            return Err(TypeConstraintError::UnknownCatalogEntry(
                "product",
                product.to_string(),
            ));
        }
        if let Some(unknown) = networks.iter().find(|code| self.network(code).is_none()) {
            return Err(TypeConstraintError::UnknownCatalogEntry(
                "network",
                unknown.to_string(),
            ));
        }
        Ok(())
    }
}
