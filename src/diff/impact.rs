//! Security and network impact narratives.
//!
//! Each narrative is composed from independent rules; when several fire the
//! fragments are joined with `"; "`. A narrative is `None` when no rule fires.

use super::services::{
    is_network_attached_service, is_network_resource_type, is_network_topology_service,
    is_security_group_type, security_service, SecurityService,
};
use super::ChangeType;
use crate::model::ResourceRecord;
use serde_json::Value;

const PUBLIC_FLAG_KEYS: &[&str] = &["publiclyAccessible", "publicAccess", "isPublic", "public"];
const PUBLIC_ADDRESS_KEYS: &[&str] = &["publicIpAddress", "publicIp", "publicDnsName", "publicDns"];
const OPEN_CIDRS: &[&str] = &["0.0.0.0/0", "::/0"];

const VPC_KEYS: &[&str] = &["vpcId", "vpc_id", "VpcId"];
const SUBNET_KEYS: &[&str] = &["subnetId", "subnet_id", "SubnetId"];

const NARRATIVE_SEPARATOR: &str = "; ";

/// The record versions a narrative is computed from.
///
/// `old` is absent for added resources and `new` for removed ones.
#[derive(Debug, Clone, Copy)]
pub struct ImpactContext<'a> {
    pub change_type: ChangeType,
    pub service: &'a str,
    pub resource_type: &'a str,
    pub old: Option<&'a ResourceRecord>,
    pub new: Option<&'a ResourceRecord>,
}

impl ImpactContext<'_> {
    fn verb(&self) -> &'static str {
        match self.change_type {
            ChangeType::Added => "created",
            ChangeType::Removed => "deleted",
            ChangeType::Modified | ChangeType::Unchanged => "modified",
        }
    }

    fn service_label(&self) -> &str {
        if self.service.is_empty() {
            "Unknown"
        } else {
            self.service
        }
    }
}

/// Whether a record exposes itself publicly.
///
/// True for an explicit public flag, an open CIDR anywhere in the record, or
/// a non-empty public IP/DNS field.
pub fn is_publicly_accessible(record: &ResourceRecord) -> bool {
    let flagged = PUBLIC_FLAG_KEYS
        .iter()
        .filter_map(|key| record.get(key))
        .any(is_truthy);
    if flagged {
        return true;
    }

    let has_address = PUBLIC_ADDRESS_KEYS
        .iter()
        .filter_map(|key| record.get(key))
        .any(|v| match v {
            Value::String(s) => !s.trim().is_empty(),
            Value::Null | Value::Bool(false) => false,
            Value::Array(items) => !items.is_empty(),
            _ => true,
        });
    if has_address {
        return true;
    }

    record.fields().values().any(mentions_open_cidr)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn mentions_open_cidr(value: &Value) -> bool {
    match value {
        Value::String(s) => OPEN_CIDRS.iter().any(|cidr| s.contains(cidr)),
        Value::Array(items) => items.iter().any(mentions_open_cidr),
        Value::Object(map) => map.values().any(mentions_open_cidr),
        _ => false,
    }
}

/// Security narrative for one resource-level change.
pub fn security_impact(ctx: &ImpactContext<'_>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let service = ctx.service_label();
    let verb = ctx.verb();

    match security_service(ctx.service) {
        Some(SecurityService::Identity) => parts.push(format!(
            "{service} identity resource {verb}: access permissions may change"
        )),
        Some(SecurityService::KeyManagement) => parts.push(format!(
            "{service} key {verb}: encryption of dependent resources may be affected"
        )),
        Some(SecurityService::SecretManagement) => parts.push(format!(
            "{service} secret {verb}: credentials used by dependent resources may be affected"
        )),
        None => {}
    }

    if is_security_group_type(ctx.resource_type) {
        let phrase = match ctx.change_type {
            ChangeType::Added => "New security group created; review its ingress and egress rules",
            ChangeType::Removed => {
                "Security group deleted; resources using it lose its access rules"
            }
            ChangeType::Modified | ChangeType::Unchanged => {
                "Security group rules modified; network access controls changed"
            }
        };
        parts.push(phrase.to_string());
    }

    if ctx.change_type == ChangeType::Modified {
        if let (Some(old), Some(new)) = (ctx.old, ctx.new) {
            match (is_publicly_accessible(old), is_publicly_accessible(new)) {
                (false, true) => parts.push("Resource became publicly accessible".to_string()),
                (true, false) => {
                    parts.push("Resource is no longer publicly accessible".to_string());
                }
                _ => {}
            }
        }
    }

    join(parts)
}

/// Network narrative for one resource-level change.
pub fn network_impact(ctx: &ImpactContext<'_>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let service = ctx.service_label();
    let verb = ctx.verb();
    let topology = is_network_topology_service(ctx.service);

    if topology {
        parts.push(format!(
            "{service} network component {verb}: traffic routing may be affected"
        ));
    } else if is_network_resource_type(ctx.resource_type) {
        parts.push(format!(
            "Network topology resource {} {verb}",
            ctx.resource_type
        ));
    }

    if matches!(ctx.change_type, ChangeType::Added | ChangeType::Removed)
        && !topology
        && is_network_attached_service(ctx.service)
    {
        parts.push(format!(
            "{service} resource {verb}: network endpoints and connectivity may change"
        ));
    }

    if ctx.change_type == ChangeType::Modified {
        if let (Some(old), Some(new)) = (ctx.old, ctx.new) {
            if let Some((from, to)) = changed_field(old, new, VPC_KEYS) {
                parts.push(format!("VPC changed from {from} to {to}"));
            }
            if let Some((from, to)) = changed_field(old, new, SUBNET_KEYS) {
                parts.push(format!("Subnet changed from {from} to {to}"));
            }
        }
    }

    join(parts)
}

/// First alias of a field whose rendered value differs between the records.
fn changed_field(
    old: &ResourceRecord,
    new: &ResourceRecord,
    keys: &[&str],
) -> Option<(String, String)> {
    let render = |record: &ResourceRecord| {
        keys.iter()
            .find_map(|key| record.get(key))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    };
    let (from, to) = (render(old), render(new));
    if from == to {
        return None;
    }
    Some((
        from.unwrap_or_else(|| "none".to_string()),
        to.unwrap_or_else(|| "none".to_string()),
    ))
}

fn join(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(NARRATIVE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ResourceRecord {
        ResourceRecord::try_from(value).expect("object literal")
    }

    fn ctx<'a>(
        change_type: ChangeType,
        service: &'a str,
        resource_type: &'a str,
        old: Option<&'a ResourceRecord>,
        new: Option<&'a ResourceRecord>,
    ) -> ImpactContext<'a> {
        ImpactContext {
            change_type,
            service,
            resource_type,
            old,
            new,
        }
    }

    #[test]
    fn test_public_accessibility_signals() {
        assert!(is_publicly_accessible(&record(json!({"publiclyAccessible": true}))));
        assert!(is_publicly_accessible(&record(json!({"isPublic": "TRUE"}))));
        assert!(is_publicly_accessible(&record(json!({"publicIp": "54.1.2.3"}))));
        assert!(is_publicly_accessible(&record(
            json!({"ingress": [{"cidr": "0.0.0.0/0", "port": 22}]})
        )));
        assert!(!is_publicly_accessible(&record(json!({"publicIp": ""}))));
        assert!(!is_publicly_accessible(&record(
            json!({"publiclyAccessible": false, "ingress": [{"cidr": "10.0.0.0/8"}]})
        )));
    }

    #[test]
    fn test_removed_rds_mentions_service() {
        let old = record(json!({"service": "RDS"}));
        let narrative = network_impact(&ctx(ChangeType::Removed, "RDS", "DBInstance", Some(&old), None))
            .expect("network narrative");
        assert!(narrative.contains("RDS"));
        assert!(narrative.contains("deleted"));
    }

    #[test]
    fn test_vpc_and_subnet_moves() {
        let old = record(json!({"vpcId": "vpc-1", "subnetId": "subnet-a"}));
        let new = record(json!({"vpcId": "vpc-2", "subnetId": "subnet-b"}));
        let narrative = network_impact(&ctx(ChangeType::Modified, "EC2", "Instance", Some(&old), Some(&new)))
            .expect("network narrative");
        assert_eq!(
            narrative,
            "VPC changed from vpc-1 to vpc-2; Subnet changed from subnet-a to subnet-b"
        );
    }

    #[test]
    fn test_modified_without_network_signal() {
        let old = record(json!({"tags": {"a": 1}}));
        let new = record(json!({"tags": {"a": 2}}));
        assert!(network_impact(&ctx(ChangeType::Modified, "EC2", "Instance", Some(&old), Some(&new))).is_none());
        assert!(security_impact(&ctx(ChangeType::Modified, "EC2", "Instance", Some(&old), Some(&new))).is_none());
    }

    #[test]
    fn test_security_group_phrasing_per_change_type() {
        let added = security_impact(&ctx(ChangeType::Added, "EC2", "SecurityGroup", None, None))
            .expect("narrative");
        assert!(added.starts_with("New security group created"));
        let removed = security_impact(&ctx(ChangeType::Removed, "EC2", "security_group", None, None))
            .expect("narrative");
        assert!(removed.starts_with("Security group deleted"));
    }

    #[test]
    fn test_identity_service_and_public_transition_joined() {
        let old = record(json!({"publicAccess": false}));
        let new = record(json!({"publicAccess": true}));
        let narrative = security_impact(&ctx(ChangeType::Modified, "IAM", "Role", Some(&old), Some(&new)))
            .expect("narrative");
        assert_eq!(
            narrative,
            "IAM identity resource modified: access permissions may change; Resource became publicly accessible"
        );
    }

    #[test]
    fn test_kms_and_secrets_narratives() {
        let kms = security_impact(&ctx(ChangeType::Removed, "KMS", "Key", None, None)).expect("kms");
        assert!(kms.contains("encryption of dependent resources"));
        let secret = security_impact(&ctx(ChangeType::Added, "SecretsManager", "Secret", None, None))
            .expect("secret");
        assert!(secret.starts_with("SecretsManager secret created"));
    }

    #[test]
    fn test_topology_service_narrative() {
        let narrative = network_impact(&ctx(ChangeType::Added, "VPC", "Subnet", None, None))
            .expect("narrative");
        assert_eq!(
            narrative,
            "VPC network component created: traffic routing may be affected"
        );
    }
}
