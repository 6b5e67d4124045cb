//! Cost aggregation over priced resource trees.
//!
//! Component costs are `quantity × unit_multiplier × price`, reduced by the
//! monthly discount. Hourly components derive their monthly cost with
//! [`HOURS_IN_MONTH`](crate::HOURS_IN_MONTH); monthly components derive their
//! hourly cost the other way round. A missing quantity or price contributes
//! nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::{hours_in_month, CostComponent, Period, Resource};

impl CostComponent {
    fn discount_factor(&self) -> Decimal {
        if self.monthly_discount_perc == 0.0 {
            return Decimal::ONE;
        }
        Decimal::try_from(self.monthly_discount_perc)
            .map(|perc| Decimal::ONE - perc)
            .unwrap_or(Decimal::ONE)
    }

    /// Cost over the component's own measurement period.
    fn period_cost(&self) -> Option<Decimal> {
        let quantity = self.quantity?;
        let price = self.price()?;
        Some(quantity * self.unit_multiplier * price * self.discount_factor())
    }

    pub fn hourly_cost(&self) -> Option<Decimal> {
        let cost = self.period_cost()?;
        Some(match self.period {
            Period::Hourly => cost,
            Period::Monthly => cost / hours_in_month(),
        })
    }

    pub fn monthly_cost(&self) -> Option<Decimal> {
        let cost = self.period_cost()?;
        Some(match self.period {
            Period::Hourly => cost * hours_in_month(),
            Period::Monthly => cost,
        })
    }
}

impl Resource {
    /// Sum of own component costs plus all sub-resource costs.
    pub fn hourly_cost(&self) -> Decimal {
        let own: Decimal = self.cost_components.iter().filter_map(|c| c.hourly_cost()).sum();
        let subs: Decimal = self.sub_resources.iter().map(|r| r.hourly_cost()).sum();
        own + subs
    }

    pub fn monthly_cost(&self) -> Decimal {
        let own: Decimal = self.cost_components.iter().filter_map(|c| c.monthly_cost()).sum();
        let subs: Decimal = self.sub_resources.iter().map(|r| r.monthly_cost()).sum();
        own + subs
    }
}

/// Totals over a forest of resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTotals {
    pub hourly_cost: Decimal,
    pub monthly_cost: Decimal,
}

impl CostTotals {
    pub fn add(&mut self, other: &CostTotals) {
        self.hourly_cost += other.hourly_cost;
        self.monthly_cost += other.monthly_cost;
    }
}

/// Total cost of a forest; skipped resources contribute nothing.
pub fn calculate_totals(resources: &[Resource]) -> CostTotals {
    resources
        .iter()
        .filter(|r| !r.is_skipped)
        .fold(CostTotals::default(), |mut totals, r| {
            totals.hourly_cost += r.hourly_cost();
            totals.monthly_cost += r.monthly_cost();
            totals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ProductFilter;

    fn priced(component: CostComponent, price: Decimal) -> CostComponent {
        let mut component = component;
        component.set_price(price);
        component
    }

    fn hourly(qty: i64, price: Decimal) -> CostComponent {
        priced(
            CostComponent::hourly("hourly", "hours", Some(Decimal::from(qty)), ProductFilter::new("aws")),
            price,
        )
    }

    fn monthly(qty: i64, price: Decimal) -> CostComponent {
        priced(
            CostComponent::monthly("monthly", "GB", Some(Decimal::from(qty)), ProductFilter::new("aws")),
            price,
        )
    }

    #[test]
    fn test_hourly_component_costs() {
        let c = hourly(2, Decimal::new(15, 2));
        assert_eq!(c.hourly_cost(), Some(Decimal::new(30, 2)));
        assert_eq!(c.monthly_cost(), Some(Decimal::new(219, 0)));
    }

    #[test]
    fn test_hourly_monthly_cost_is_exact_multiple() {
        for (qty, price) in [(1, Decimal::new(1, 4)), (3, Decimal::new(987654321, 9)), (17, Decimal::new(3, 1))] {
            let c = hourly(qty, price);
            assert_eq!(c.monthly_cost().unwrap(), c.hourly_cost().unwrap() * hours_in_month());
        }
    }

    #[test]
    fn test_monthly_component_costs() {
        let c = monthly(100, Decimal::new(10, 2));
        assert_eq!(c.monthly_cost(), Some(Decimal::from(10)));
        assert_eq!(c.hourly_cost(), Some(Decimal::from(10) / Decimal::from(730)));
    }

    #[test]
    fn test_unit_multiplier_scales_quantity() {
        let c = monthly(5_000_000, Decimal::new(40, 2)).with_unit_multiplier(Decimal::new(1, 6));
        assert_eq!(c.monthly_cost(), Some(Decimal::from(2)));
    }

    #[test]
    fn test_discount_reduces_cost() {
        let c = monthly(100, Decimal::ONE).with_monthly_discount(0.25);
        assert_eq!(c.monthly_cost(), Some(Decimal::from(75)));
    }

    #[test]
    fn test_nil_quantity_contributes_nothing() {
        let c = priced(
            CostComponent::monthly("Requests", "requests", None, ProductFilter::new("aws")),
            Decimal::from(1000),
        );
        assert!(c.hourly_cost().is_none());

        let r = Resource::new("aws_sqs_queue.q", "aws_sqs_queue").with_component(c);
        assert_eq!(r.hourly_cost(), Decimal::ZERO);
        assert_eq!(r.monthly_cost(), Decimal::ZERO);
    }

    #[test]
    fn test_nil_price_contributes_nothing() {
        let c = CostComponent::hourly("c", "hours", Some(Decimal::ONE), ProductFilter::new("aws"));
        assert!(c.monthly_cost().is_none());
    }

    #[test]
    fn test_resource_sums_components_and_sub_resources() {
        let child = Resource::new("disk", "").with_component(monthly(10, Decimal::new(10, 2)));
        let grandchild = Resource::new("snapshot", "").with_component(monthly(4, Decimal::new(5, 2)));
        let child2 = Resource::new("other", "").with_sub_resource(grandchild);
        let parent = Resource::new("vm", "vm")
            .with_component(hourly(1, Decimal::new(2, 2)))
            .with_sub_resource(child)
            .with_sub_resource(child2);

        let expected_monthly = Decimal::new(146, 1) + Decimal::ONE + Decimal::new(2, 1);
        assert_eq!(parent.monthly_cost(), expected_monthly);

        let own: Decimal = parent.cost_components.iter().filter_map(|c| c.hourly_cost()).sum();
        let subs: Decimal = parent.sub_resources.iter().map(|r| r.hourly_cost()).sum();
        assert_eq!(parent.hourly_cost(), own + subs);
    }

    #[test]
    fn test_calculate_totals_ignores_skipped() {
        let priced_resource = Resource::new("a", "t").with_component(monthly(1, Decimal::from(3)));
        let mut skipped = Resource::new("b", "t").with_component(monthly(1, Decimal::from(100)));
        skipped.is_skipped = true;

        let totals = calculate_totals(&[priced_resource, skipped]);
        assert_eq!(totals.monthly_cost, Decimal::from(3));
    }
}
