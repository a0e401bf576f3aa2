//! Static service and resource-type tables.
//!
//! Service labels are compared after [`normalize_service`], so `EC2`, `ec2`
//! and `Secrets-Manager` / `secretsmanager` are equivalent.

use super::ChangeSeverity;

const CRITICAL_SERVICES: &[&str] = &[
    "iam",
    "kms",
    "secretsmanager",
    "sso",
    "identitystore",
    "acm",
    "cognito",
];

const HIGH_SERVICES: &[&str] = &[
    "ec2",
    "vpc",
    "lambda",
    "ecs",
    "eks",
    "rds",
    "dynamodb",
    "aurora",
    "elb",
    "elbv2",
    "elasticloadbalancing",
    "elasticache",
    "redshift",
    "route53",
    "directconnect",
    "networkfirewall",
];

const MEDIUM_SERVICES: &[&str] = &[
    "s3",
    "efs",
    "ebs",
    "fsx",
    "glacier",
    "backup",
    "cloudfront",
    "apigateway",
    "globalaccelerator",
];

const IDENTITY_SERVICES: &[&str] = &["iam", "sso", "identitystore", "cognito"];
const KEY_SERVICES: &[&str] = &["kms"];
const SECRET_SERVICES: &[&str] = &["secretsmanager"];

const NETWORK_TOPOLOGY_SERVICES: &[&str] = &[
    "vpc",
    "route53",
    "directconnect",
    "networkfirewall",
    "transitgateway",
    "elb",
    "elbv2",
    "elasticloadbalancing",
    "cloudfront",
    "apigateway",
    "globalaccelerator",
];

const NETWORK_ATTACHED_SERVICES: &[&str] = &[
    "ec2",
    "rds",
    "aurora",
    "lambda",
    "ecs",
    "eks",
    "elasticache",
    "redshift",
];

const NETWORK_RESOURCE_TYPES: &[&str] = &[
    "vpc",
    "subnet",
    "routetable",
    "internetgateway",
    "natgateway",
    "networkinterface",
    "networkacl",
    "loadbalancer",
    "transitgateway",
    "vpcendpoint",
];

/// Role a service plays in access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityService {
    Identity,
    KeyManagement,
    SecretManagement,
}

/// Lowercase and strip `-`, `_` and whitespace.
pub fn normalize_service(service: &str) -> String {
    service
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn in_table(table: &[&str], service: &str) -> bool {
    let normalized = normalize_service(service);
    table.iter().any(|s| *s == normalized)
}

/// Resource-level severity for a pure add/remove of a resource of `service`.
pub fn service_importance(service: &str) -> ChangeSeverity {
    if in_table(CRITICAL_SERVICES, service) {
        ChangeSeverity::Critical
    } else if in_table(HIGH_SERVICES, service) {
        ChangeSeverity::High
    } else if in_table(MEDIUM_SERVICES, service) {
        ChangeSeverity::Medium
    } else {
        ChangeSeverity::Low
    }
}

pub fn security_service(service: &str) -> Option<SecurityService> {
    if in_table(IDENTITY_SERVICES, service) {
        Some(SecurityService::Identity)
    } else if in_table(KEY_SERVICES, service) {
        Some(SecurityService::KeyManagement)
    } else if in_table(SECRET_SERVICES, service) {
        Some(SecurityService::SecretManagement)
    } else {
        None
    }
}

pub fn is_network_topology_service(service: &str) -> bool {
    in_table(NETWORK_TOPOLOGY_SERVICES, service)
}

pub fn is_network_attached_service(service: &str) -> bool {
    in_table(NETWORK_ATTACHED_SERVICES, service)
}

/// Resource type naming a security group (contains "security" and "group").
pub fn is_security_group_type(resource_type: &str) -> bool {
    let lower = resource_type.to_lowercase();
    lower.contains("security") && lower.contains("group")
}

pub fn is_network_resource_type(resource_type: &str) -> bool {
    let normalized = normalize_service(resource_type);
    NETWORK_RESOURCE_TYPES.iter().any(|t| normalized.contains(t))
}
