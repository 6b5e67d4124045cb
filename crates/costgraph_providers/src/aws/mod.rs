//! AWS cost models.

mod dx_connection;
mod ebs_volume;
mod eip;
mod eks_fargate_profile;
mod elasticsearch_domain;
mod instance;
mod kms_key;
mod nat_gateway;
mod sqs_queue;
mod vpn_connection;

use crate::registry::RegistryItem;

pub fn registry_items() -> Vec<RegistryItem> {
    vec![
        dx_connection::registry_item(),
        ebs_volume::registry_item(),
        eip::registry_item(),
        eks_fargate_profile::registry_item(),
        elasticsearch_domain::registry_item(),
        instance::registry_item(),
        kms_key::registry_item(),
        nat_gateway::registry_item(),
        sqs_queue::registry_item(),
        vpn_connection::registry_item(),
    ]
}

/// Location name used by the pricing API for a region code.
pub(crate) fn region_location(region: &str) -> Option<&'static str> {
    let location = match region {
        "us-gov-west-1" => "AWS GovCloud (US-West)",
        "us-gov-east-1" => "AWS GovCloud (US-East)",
        "us-east-1" => "US East (N. Virginia)",
        "us-east-2" => "US East (Ohio)",
        "us-west-1" => "US West (N. California)",
        "us-west-2" => "US West (Oregon)",
        "us-west-2-lax-1" => "US West (Los Angeles)",
        "ca-central-1" => "Canada (Central)",
        "cn-north-1" => "China (Beijing)",
        "cn-northwest-1" => "China (Ningxia)",
        "eu-central-1" => "EU (Frankfurt)",
        "eu-west-1" => "EU (Ireland)",
        "eu-west-2" => "EU (London)",
        "eu-south-1" => "EU (Milan)",
        "eu-west-3" => "EU (Paris)",
        "eu-north-1" => "EU (Stockholm)",
        "ap-east-1" => "Asia Pacific (Hong Kong)",
        "ap-northeast-1" => "Asia Pacific (Tokyo)",
        "ap-northeast-2" => "Asia Pacific (Seoul)",
        "ap-northeast-3" => "Asia Pacific (Osaka-Local)",
        "ap-southeast-1" => "Asia Pacific (Singapore)",
        "ap-southeast-2" => "Asia Pacific (Sydney)",
        "ap-south-1" => "Asia Pacific (Mumbai)",
        "me-south-1" => "Middle East (Bahrain)",
        "sa-east-1" => "South America (Sao Paulo)",
        "af-south-1" => "Africa (Cape Town)",
        _ => return None,
    };
    Some(location)
}

/// AWS and utility provider types that are free of charge.
pub const FREE_RESOURCES: &[&str] = &[
    // Elastic Load Balancing
    "aws_alb_listener",
    "aws_alb_listener_rule",
    "aws_alb_target_group",
    "aws_alb_target_group_attachment",
    "aws_lb_listener",
    "aws_lb_listener_rule",
    "aws_lb_target_group",
    "aws_lb_target_group_attachment",
    // IAM
    "aws_iam_access_key",
    "aws_iam_group",
    "aws_iam_group_policy",
    "aws_iam_group_policy_attachment",
    "aws_iam_instance_profile",
    "aws_iam_policy",
    "aws_iam_policy_attachment",
    "aws_iam_role",
    "aws_iam_role_policy",
    "aws_iam_role_policy_attachment",
    "aws_iam_user",
    "aws_iam_user_policy",
    "aws_iam_user_policy_attachment",
    // KMS
    "aws_kms_alias",
    "aws_kms_grant",
    // Other
    "aws_eip_association",
    "aws_key_pair",
    "aws_launch_configuration",
    "aws_launch_template",
    "aws_sqs_queue_policy",
    "aws_volume_attachment",
    // VPC
    "aws_customer_gateway",
    "aws_default_network_acl",
    "aws_default_route_table",
    "aws_default_security_group",
    "aws_default_vpc",
    "aws_egress_only_internet_gateway",
    "aws_internet_gateway",
    "aws_main_route_table_association",
    "aws_network_acl",
    "aws_network_acl_rule",
    "aws_network_interface",
    "aws_route",
    "aws_route_table",
    "aws_route_table_association",
    "aws_security_group",
    "aws_security_group_rule",
    "aws_subnet",
    "aws_vpc",
    "aws_vpc_dhcp_options",
    "aws_vpc_dhcp_options_association",
    "aws_vpn_connection_route",
    "aws_vpn_gateway",
    "aws_vpn_gateway_attachment",
    "aws_vpn_gateway_route_propagation",
    // Hashicorp
    "local_file",
    "null_resource",
    "random_id",
    "random_integer",
    "random_password",
    "random_pet",
    "random_string",
    "random_uuid",
    "time_sleep",
    "tls_private_key",
];
