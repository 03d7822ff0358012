use crate::app::authorize;
use crate::core::access::{self, Capability};
use crate::core::client::{ApiClient, Resource};
use crate::domain::model::{Quote, QuoteDraft, SparePart, SupportRequest};
use crate::domain::ports::TokenStore;
use crate::utils::error::{Result, SupportError};

/// Everything the quotes screen needs, already filtered for the viewer.
#[derive(Debug, Clone, Default)]
pub struct QuoteOverview {
    pub support_requests: Vec<SupportRequest>,
    pub spare_parts: Vec<SparePart>,
    pub quotes: Vec<Quote>,
}

/// Sum of the selected parts' costs. Ids missing from `parts` count as zero.
pub fn total_cost(parts: &[SparePart], selected: &[i64]) -> f64 {
    selected
        .iter()
        .map(|id| {
            parts
                .iter()
                .find(|part| part.spare_part_id == *id)
                .map_or(0.0, |part| part.cost)
        })
        .sum()
}

// 多選欄位，同一零件只算一次
fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

pub struct QuoteService<'a, S: TokenStore> {
    client: &'a ApiClient<S>,
}

impl<'a, S: TokenStore> QuoteService<'a, S> {
    pub fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// Fetch requests, parts and quotes concurrently, then filter them.
    pub async fn overview(&self) -> Result<QuoteOverview> {
        let identity = self.client.require_identity()?;

        let (requests, parts, quotes) = tokio::try_join!(
            self.client.list::<SupportRequest>(Resource::SupportRequest),
            self.client.list::<SparePart>(Resource::SparePart),
            self.client.list::<Quote>(Resource::Quote),
        )?;

        let support_requests = access::visible_support_requests(&identity, requests);
        let quotes = access::visible_quotes(&identity, quotes, &support_requests);
        let spare_parts = access::visible_spare_parts(&identity, parts);

        tracing::debug!(
            "Quote overview: {} requests, {} parts, {} quotes",
            support_requests.len(),
            spare_parts.len(),
            quotes.len()
        );

        Ok(QuoteOverview {
            support_requests,
            spare_parts,
            quotes,
        })
    }

    pub async fn list(&self) -> Result<Vec<Quote>> {
        Ok(self.overview().await?.quotes)
    }

    async fn draft(
        &self,
        support_request_id: i64,
        spare_part_ids: &[i64],
        description: &str,
    ) -> Result<(QuoteDraft, Vec<SparePart>)> {
        let parts: Vec<SparePart> = self.client.list(Resource::SparePart).await?;
        let spare_part_ids = dedup_ids(spare_part_ids);
        let draft = QuoteDraft {
            support_request_id,
            total_cost: total_cost(&parts, &spare_part_ids),
            spare_part_ids,
            description: description.to_string(),
        };
        Ok((draft, parts))
    }

    /// Issue a quote and take one unit of each selected part out of stock.
    ///
    /// The quote and the stock updates are separate calls. A failed stock
    /// update is logged and does not undo the quote.
    pub async fn create(
        &self,
        support_request_id: i64,
        spare_part_ids: &[i64],
        description: &str,
    ) -> Result<QuoteOverview> {
        authorize(self.client, Capability::ManageQuotes)?;

        let (draft, parts) = self
            .draft(support_request_id, spare_part_ids, description)
            .await?;
        self.client.create(Resource::Quote, &draft).await?;
        tracing::info!(
            "Quote created for request {} (total {:.2})",
            support_request_id,
            draft.total_cost
        );

        for id in &draft.spare_part_ids {
            let Some(part) = parts.iter().find(|part| part.spare_part_id == *id) else {
                tracing::warn!("Spare part {} not found, stock left unchanged", id);
                continue;
            };
            let updated = SparePart {
                stock_level: part.stock_level - 1,
                ..part.clone()
            };
            match self.client.update(Resource::SparePart, *id, &updated).await {
                Ok(()) => tracing::debug!("Stock for '{}' now {}", part.name, updated.stock_level),
                Err(SupportError::Unauthorized) => return Err(SupportError::Unauthorized),
                Err(e) => {
                    tracing::error!("❌ Error updating stock for spare part {}: {}", part.name, e)
                }
            }
        }

        self.overview().await
    }

    /// Re-price and replace a quote. Stock is not touched.
    pub async fn update(
        &self,
        quote_id: i64,
        support_request_id: i64,
        spare_part_ids: &[i64],
        description: &str,
    ) -> Result<QuoteOverview> {
        authorize(self.client, Capability::ManageQuotes)?;

        let (draft, _) = self
            .draft(support_request_id, spare_part_ids, description)
            .await?;
        self.client.update(Resource::Quote, quote_id, &draft).await?;
        tracing::info!("Quote {} updated (total {:.2})", quote_id, draft.total_cost);
        self.overview().await
    }

    pub async fn delete(&self, quote_id: i64) -> Result<QuoteOverview> {
        authorize(self.client, Capability::ManageQuotes)?;
        self.client.remove(Resource::Quote, quote_id).await?;
        tracing::info!("Quote {} deleted", quote_id);
        self.overview().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: i64, cost: f64) -> SparePart {
        SparePart {
            spare_part_id: id,
            name: format!("part-{}", id),
            stock_level: 3,
            cost,
        }
    }

    #[test]
    fn test_total_cost_sums_selected_parts() {
        let parts = vec![part(1, 120.0), part(2, 45.5), part(3, 10.0)];
        assert_eq!(total_cost(&parts, &[1, 2]), 165.5);
        assert_eq!(total_cost(&parts, &[]), 0.0);
    }

    #[test]
    fn test_total_cost_ignores_unknown_ids() {
        let parts = vec![part(1, 120.0)];
        assert_eq!(total_cost(&parts, &[1, 99]), 120.0);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
