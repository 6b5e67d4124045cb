//! Cost model nodes and the filters used to price them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical number of hours in a month.
pub const HOURS_IN_MONTH: i64 = 730;

/// [`HOURS_IN_MONTH`] as a decimal.
pub fn hours_in_month() -> Decimal {
    Decimal::from(HOURS_IN_MONTH)
}

/// The period a cost component quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hourly,
    Monthly,
}

/// A single attribute constraint of a product filter.
///
/// Exactly one of `value` and `value_regex` is expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "value_regex")]
    pub value_regex: Option<String>,
}

impl AttributeFilter {
    /// Match the attribute value exactly.
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            value_regex: None,
        }
    }

    /// Match the attribute value against a `/pattern/flags` regex.
    pub fn regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            value_regex: Some(pattern.into()),
        }
    }
}

/// Product selection criteria sent to the pricing source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_filters: Vec<AttributeFilter>,
}

impl ProductFilter {
    pub fn new(vendor_name: impl Into<String>) -> Self {
        Self {
            vendor_name: Some(vendor_name.into()),
            ..Default::default()
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn product_family(mut self, family: impl Into<String>) -> Self {
        self.product_family = Some(family.into());
        self
    }

    pub fn attribute(mut self, filter: AttributeFilter) -> Self {
        self.attribute_filters.push(filter);
        self
    }
}

/// Price selection criteria applied to the prices of a matched product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "description_regex")]
    pub description_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_usage_amount: Option<String>,
}

impl PriceFilter {
    pub fn on_demand() -> Self {
        Self::purchase_option("on_demand")
    }

    pub fn purchase_option(option: impl Into<String>) -> Self {
        Self {
            purchase_option: Some(option.into()),
            ..Default::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description_regex(mut self, pattern: impl Into<String>) -> Self {
        self.description_regex = Some(pattern.into());
        self
    }

    pub fn with_start_usage_amount(mut self, amount: impl Into<String>) -> Self {
        self.start_usage_amount = Some(amount.into());
        self
    }
}

/// One priceable line item of a [`Resource`].
///
/// A component is measured either per hour or per month. A `None` quantity
/// means the usage needed to cost it is unknown: the component is still
/// priced, but it contributes nothing to totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CostComponent {
    pub name: String,
    pub unit: String,
    /// Scales the raw quantity into priced units.
    pub unit_multiplier: Decimal,
    pub period: Period,
    pub quantity: Option<Decimal>,
    pub product_filter: ProductFilter,
    pub price_filter: Option<PriceFilter>,
    pub monthly_discount_perc: f64,
    price: Option<Decimal>,
    price_hash: Option<String>,
}

impl CostComponent {
    fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        period: Period,
        quantity: Option<Decimal>,
        product_filter: ProductFilter,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            unit_multiplier: Decimal::ONE,
            period,
            quantity,
            product_filter,
            price_filter: None,
            monthly_discount_perc: 0.0,
            price: None,
            price_hash: None,
        }
    }

    /// Create a component measured per hour.
    pub fn hourly(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Option<Decimal>,
        product_filter: ProductFilter,
    ) -> Self {
        Self::new(name, unit, Period::Hourly, quantity, product_filter)
    }

    /// Create a component measured per month.
    pub fn monthly(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Option<Decimal>,
        product_filter: ProductFilter,
    ) -> Self {
        Self::new(name, unit, Period::Monthly, quantity, product_filter)
    }

    pub fn with_unit_multiplier(mut self, multiplier: Decimal) -> Self {
        self.unit_multiplier = multiplier;
        self
    }

    pub fn with_price_filter(mut self, filter: PriceFilter) -> Self {
        self.price_filter = Some(filter);
        self
    }

    pub fn with_monthly_discount(mut self, perc: f64) -> Self {
        self.monthly_discount_perc = perc;
        self
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = Some(price);
    }

    pub fn price_hash(&self) -> Option<&str> {
        self.price_hash.as_deref()
    }

    pub fn set_price_hash(&mut self, hash: impl Into<String>) {
        self.price_hash = Some(hash.into());
    }

    /// Quantity per hour, converting monthly quantities with [`HOURS_IN_MONTH`].
    pub fn hourly_quantity(&self) -> Option<Decimal> {
        let quantity = self.quantity?;
        Some(match self.period {
            Period::Hourly => quantity,
            Period::Monthly => quantity / hours_in_month(),
        })
    }

    /// Quantity per month, converting hourly quantities with [`HOURS_IN_MONTH`].
    pub fn monthly_quantity(&self) -> Option<Decimal> {
        let quantity = self.quantity?;
        Some(match self.period {
            Period::Hourly => quantity * hours_in_month(),
            Period::Monthly => quantity,
        })
    }
}

/// A cost model node.
///
/// Usually one infrastructure resource, with its billable parts either as
/// components or as nested sub-resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    pub cost_components: Vec<CostComponent>,
    pub sub_resources: Vec<Resource>,
    pub no_price: bool,
    pub is_skipped: bool,
    pub skip_message: Option<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    /// A resource that is known to be free of charge.
    pub fn free(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            no_price: true,
            is_skipped: true,
            skip_message: Some("Free resource.".to_string()),
            ..Self::new(name, resource_type)
        }
    }

    /// A resource that could not be costed.
    pub fn skipped(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            is_skipped: true,
            skip_message: Some(message.into()),
            ..Self::new(name, resource_type)
        }
    }

    pub fn with_component(mut self, component: CostComponent) -> Self {
        self.cost_components.push(component);
        self
    }

    pub fn with_components(mut self, components: impl IntoIterator<Item = CostComponent>) -> Self {
        self.cost_components.extend(components);
        self
    }

    pub fn with_sub_resource(mut self, resource: Resource) -> Self {
        self.sub_resources.push(resource);
        self
    }

    /// Whether the resource carries anything to price.
    pub fn has_cost(&self) -> bool {
        !self.is_skipped && !self.no_price
    }

    /// Iterate over the components of this node and all its descendants.
    pub fn flatten_components(&self) -> Vec<&CostComponent> {
        let mut components: Vec<&CostComponent> = self.cost_components.iter().collect();
        for sub in &self.sub_resources {
            components.extend(sub.flatten_components());
        }
        components
    }
}
