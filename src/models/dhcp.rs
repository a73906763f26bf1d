use super::FreeformTags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum DhcpServerType {
        VcnLocal = "VcnLocal",
        VcnLocalPlusInternet = "VcnLocalPlusInternet",
        CustomDnsServer = "CustomDnsServer",
    }
}

string_enum! {
    pub enum DhcpOptionsLifecycleState {
        Provisioning = "PROVISIONING",
        Available = "AVAILABLE",
        Terminating = "TERMINATING",
        Terminated = "TERMINATED",
    }
}

/// DNS servers handed out by DHCP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpDnsOption {
    pub server_type: DhcpServerType,
    /// Only used with `CustomDnsServer`; up to three addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dns_servers: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpSearchDomainOption {
    pub search_domain_names: Vec<String>,
}

tagged_union! {
    /// One DHCP option of a set.
    pub enum DhcpOption: "type" {
        "DomainNameServer" => DomainNameServer(DhcpDnsOption),
        "SearchDomain" => SearchDomain(DhcpSearchDomainOption),
    }
}

/// A set of DHCP options for a virtual cloud network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOptions {
    pub id: String,
    pub compartment_id: String,
    pub lifecycle_state: DhcpOptionsLifecycleState,
    pub options: Vec<DhcpOption>,
    pub time_created: DateTime<Utc>,
    pub vcn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymorphic;

    #[test]
    fn test_every_option_type_round_trips() {
        polymorphic::assert_round_trips(&[
            (
                "DomainNameServer",
                DhcpOption::from(DhcpDnsOption {
                    server_type: DhcpServerType::CustomDnsServer,
                    custom_dns_servers: Some(vec!["10.0.0.2".into(), "10.0.0.3".into()]),
                }),
            ),
            (
                "SearchDomain",
                DhcpSearchDomainOption {
                    search_domain_names: vec!["example.internal".into()],
                }
                .into(),
            ),
        ]);
    }

    #[test]
    fn test_option_list_inside_record() {
        let payload = r#"{
            "id": "D",
            "compartmentId": "C",
            "lifecycleState": "AVAILABLE",
            "timeCreated": "2024-03-01T10:00:00Z",
            "vcnId": "VCN",
            "options": [
                {"type": "DomainNameServer", "serverType": "VcnLocalPlusInternet"},
                {"type": "SearchDomain", "searchDomainNames": ["example.internal"]},
                {"type": "NtpServer", "servers": ["10.0.0.1"]}
            ]
        }"#;

        let options: DhcpOptions = serde_json::from_str(payload).unwrap();
        assert_eq!(options.options.len(), 3);
        assert!(matches!(
            &options.options[0],
            DhcpOption::DomainNameServer(dns)
                if dns.server_type == DhcpServerType::VcnLocalPlusInternet
        ));
        assert!(matches!(&options.options[1], DhcpOption::SearchDomain(_)));
        assert!(options.options[2].is_unknown());

        let encoded = serde_json::to_string(&options).unwrap();
        let again: DhcpOptions = serde_json::from_str(&encoded).unwrap();
        assert_eq!(again, options);
    }
}
