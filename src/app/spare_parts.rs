use crate::app::authorize;
use crate::core::access::{self, Capability};
use crate::core::client::{ApiClient, Resource};
use crate::domain::model::{NewSparePart, SparePart};
use crate::domain::ports::TokenStore;
use crate::utils::error::{Result, SupportError};
use crate::utils::validation::require_fields;

/// Part names offered when adding stock.
pub const CATALOG: [&str; 10] = [
    "CPU",
    "RAM",
    "Motherboard",
    "GPU",
    "Hard Drive",
    "Power Supply",
    "Cooling Fan",
    "Case",
    "Keyboard",
    "Mouse",
];

/// Catalogue entry matching `name`, ignoring case and surrounding blanks.
pub fn catalog_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CATALOG
        .iter()
        .copied()
        .find(|entry| entry.eq_ignore_ascii_case(name))
}

pub struct SparePartService<'a, S: TokenStore> {
    client: &'a ApiClient<S>,
}

impl<'a, S: TokenStore> SparePartService<'a, S> {
    pub fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<SparePart>> {
        let identity = self.client.require_identity()?;
        let rows = self.client.list(Resource::SparePart).await?;
        Ok(access::visible_spare_parts(&identity, rows))
    }

    pub async fn create(&self, name: &str, stock_level: i64, cost: f64) -> Result<Vec<SparePart>> {
        authorize(self.client, Capability::AddSpareParts)?;
        require_fields(&[("Spare Part", name)])?;
        let name = catalog_name(name).ok_or_else(|| {
            SupportError::validation(format!(
                "Unknown spare part '{}'. Choose one of: {}",
                name.trim(),
                CATALOG.join(", ")
            ))
        })?;

        let body = NewSparePart {
            name: name.to_string(),
            stock_level,
            cost,
        };
        self.client.create(Resource::SparePart, &body).await?;
        tracing::info!("Spare part '{}' added ({} in stock)", name, stock_level);
        self.list().await
    }

    pub async fn update(&self, part: &SparePart) -> Result<Vec<SparePart>> {
        authorize(self.client, Capability::ManageSpareParts)?;
        self.client
            .update(Resource::SparePart, part.spare_part_id, part)
            .await?;
        tracing::info!("Spare part {} updated", part.spare_part_id);
        self.list().await
    }

    pub async fn delete(&self, spare_part_id: i64) -> Result<Vec<SparePart>> {
        authorize(self.client, Capability::ManageSpareParts)?;
        self.client.remove(Resource::SparePart, spare_part_id).await?;
        tracing::info!("Spare part {} deleted", spare_part_id);
        self.list().await
    }
}
