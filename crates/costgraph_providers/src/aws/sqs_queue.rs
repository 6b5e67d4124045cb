use costgraph_plan::{Attributes, ResourceRef, UsageData};
use costgraph_schema::{AttributeFilter, CostComponent, Resource};
use rust_decimal::Decimal;

use crate::registry::RegistryItem;
use crate::util::{aws_filter, usage_decimal};

/// Requests are billed in 64 KB chunks.
const REQUEST_CHUNK_KB: i64 = 64;

pub fn registry_item() -> RegistryItem {
    RegistryItem::new("aws_sqs_queue", new_sqs_queue)
}

fn new_sqs_queue(d: ResourceRef<'_>, u: Option<&UsageData>) -> Option<Resource> {
    let queue_type = if d.get_bool("fifo_queue") {
        "FIFO (first-in, first-out)"
    } else {
        "Standard"
    };

    let request_size = usage_decimal(u, "request_size").unwrap_or_else(|| Decimal::from(REQUEST_CHUNK_KB));
    let requests = usage_decimal(u, "monthly_requests").map(|r| billed_requests(request_size, r));

    Some(Resource::new(&d.address, &d.resource_type).with_component(CostComponent::monthly(
        "Requests",
        "requests",
        requests,
        aws_filter(d.region(), "AWSQueueService", "API Request")
            .attribute(AttributeFilter::exact("queueType", queue_type)),
    )))
}

fn billed_requests(request_size: Decimal, monthly_requests: Decimal) -> Decimal {
    (request_size / Decimal::from(REQUEST_CHUNK_KB)).ceil() * monthly_requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::graph_with;
    use serde_json::json;

    #[test]
    fn test_billed_requests() {
        assert_eq!(billed_requests(Decimal::from(64), Decimal::from(100)), Decimal::from(100));
        assert_eq!(billed_requests(Decimal::from(65), Decimal::from(100)), Decimal::from(200));
        assert_eq!(billed_requests(Decimal::from(1), Decimal::from(100)), Decimal::from(100));
    }

    #[test]
    fn test_sqs_queue_without_usage_has_nil_quantity() {
        let graph = graph_with("aws_sqs_queue", "aws_sqs_queue.q", json!({"fifo_queue": true}));
        let r = new_sqs_queue(graph.get("aws_sqs_queue.q").unwrap(), None).unwrap();

        let requests = &r.cost_components[0];
        assert!(requests.quantity.is_none());
        assert_eq!(
            requests.product_filter.attribute_filters[0].value.as_deref(),
            Some("FIFO (first-in, first-out)")
        );
    }

    #[test]
    fn test_sqs_queue_with_usage() {
        let graph = graph_with("aws_sqs_queue", "aws_sqs_queue.q", json!({}));
        let usage = UsageData::new("aws_sqs_queue.q", json!({"monthly_requests": 1_000_000, "request_size": 128}));
        let r = new_sqs_queue(graph.get("aws_sqs_queue.q").unwrap(), Some(&usage)).unwrap();
        assert_eq!(r.cost_components[0].quantity, Some(Decimal::from(2_000_000)));
    }
}
