use crate::application::services::{require_credentials, required};
use crate::domain::entities::{
    closed_lost_flag, eligible_by_installation_date, format_amount_eur, quote_signed_flag,
    split_products, Deal,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::crm_client::{CrmClient, CrmObject, CrmObjectType};
use std::sync::Arc;
use tracing::info;

const DEAL_PROPERTIES: &[&str] = &[
    "dealname",
    "dealstage",
    "amount",
    "closedate",
    "createdate",
    "pipeline",
    "dealtype",
    "address",
    "postcode",
    "date_entered__installation_done_",
    "products",
    "is_quote_signed",
    "hs_is_closed_lost",
];

#[derive(Clone)]
pub struct DealService {
    crm: Arc<dyn CrmClient>,
}

impl DealService {
    pub fn new(crm: Arc<dyn CrmClient>) -> Self {
        Self { crm }
    }

    /// Deals of a contact that can carry a new ticket, latest installation first
    pub async fn search_deals(&self, contact_id: Option<&str>) -> DomainResult<Vec<Deal>> {
        let contact_id = required(contact_id, "Contact ID is required")?;
        require_credentials(self.crm.as_ref())?;

        info!("Searching deals for contact {}", contact_id);

        let deal_ids = self
            .crm
            .associated_ids(CrmObjectType::Contacts, contact_id, CrmObjectType::Deals)
            .await?;
        if deal_ids.is_empty() {
            info!("Contact {} has no deals", contact_id);
            return Ok(Vec::new());
        }

        let objects = self
            .crm
            .batch_read(CrmObjectType::Deals, &deal_ids, DEAL_PROPERTIES)
            .await?;

        let total = objects.len();
        let deals = eligible_by_installation_date(objects.iter().map(deal_from_object).collect());
        info!(
            "Contact {} has {} eligible deal(s) out of {}",
            contact_id,
            deals.len(),
            total
        );

        Ok(deals)
    }
}

fn deal_from_object(object: &CrmObject) -> Deal {
    Deal {
        id: object.id.clone(),
        deal_id: object.id.clone(),
        name: object
            .prop_owned("dealname")
            .unwrap_or_else(|| "Sans nom".to_string()),
        stage: object
            .prop_owned("dealstage")
            .unwrap_or_else(|| "Unknown".to_string()),
        amount: format_amount_eur(object.prop("amount")),
        close_date: object.prop_owned("closedate"),
        created_date: object.prop_owned("createdate"),
        pipeline: object
            .prop_owned("pipeline")
            .unwrap_or_else(|| "default".to_string()),
        deal_type: object.prop_owned("dealtype"),
        address: object.prop_owned("address").unwrap_or_default(),
        postcode: object.prop_owned("postcode").unwrap_or_default(),
        installation_done_date: object.prop_owned("date_entered__installation_done_"),
        products: split_products(object.prop("products")),
        is_quote_signed: quote_signed_flag(object.prop("is_quote_signed")),
        is_closed_lost: closed_lost_flag(object.prop("hs_is_closed_lost")),
    }
}
