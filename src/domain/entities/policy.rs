//! Bucket access policy
//!
//! Two pieces lock the bucket down: a fully restrictive public access block,
//! and a single-statement resource policy that lets exactly one distribution
//! read objects through its service principal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Service principal of the delivery network
pub const CDN_SERVICE_PRINCIPAL: &str = "cloudfront.amazonaws.com";

/// Condition key that pins the grant to one distribution
pub const SOURCE_ARN_CONDITION_KEY: &str = "AWS:SourceArn";

const STATEMENT_SID: &str = "AllowCloudFrontServicePrincipalReadOnly";

/// Bucket-level flags rejecting public ACLs and policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// Every flag set
    pub fn fully_restrictive() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }

    pub fn is_fully_restrictive(&self) -> bool {
        *self == Self::fully_restrictive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: String,
    pub principal: Principal,
    pub action: String,
    pub resource: String,
    pub condition: BTreeMap<String, BTreeMap<String, String>>,
}

/// JSON resource policy attached to the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Policy validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyValidationError {
    #[error("invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: String },

    #[error("malformed distribution ARN '{0}'")]
    MalformedDistributionArn(String),
}

impl PolicyDocument {
    /// Read-only grant for one distribution
    pub fn cdn_read_only(
        bucket: &str,
        distribution_arn: &str,
    ) -> Result<Self, PolicyValidationError> {
        validate_bucket_name(bucket)?;
        validate_distribution_arn(distribution_arn)?;

        let mut equals = BTreeMap::new();
        equals.insert(
            SOURCE_ARN_CONDITION_KEY.to_string(),
            distribution_arn.to_string(),
        );
        let mut condition = BTreeMap::new();
        condition.insert("StringEquals".to_string(), equals);

        Ok(Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                sid: STATEMENT_SID.to_string(),
                effect: "Allow".to_string(),
                principal: Principal {
                    service: CDN_SERVICE_PRINCIPAL.to_string(),
                },
                action: "s3:GetObject".to_string(),
                resource: format!("arn:aws:s3:::{bucket}/*"),
                condition,
            }],
        })
    }

    /// The distribution ARN the grant is pinned to
    pub fn source_arn(&self) -> Option<&str> {
        self.statement
            .first()
            .and_then(|s| s.condition.get("StringEquals"))
            .and_then(|eq| eq.get(SOURCE_ARN_CONDITION_KEY))
            .map(String::as_str)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Compare against a policy fetched from the store, ignoring formatting
    pub fn matches_json(&self, existing: &str) -> bool {
        let Ok(existing) = serde_json::from_str::<serde_json::Value>(existing) else {
            return false;
        };
        serde_json::to_value(self).is_ok_and(|desired| desired == existing)
    }
}

/// Bucket naming rules: 3-63 chars of lowercase letters, digits, `-` and `.`,
/// starting and ending with a letter or digit, no `..`
pub fn validate_bucket_name(name: &str) -> Result<(), PolicyValidationError> {
    let fail = |reason: &str| {
        Err(PolicyValidationError::InvalidBucketName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if !(3..=63).contains(&name.len()) {
        return fail("must be between 3 and 63 characters");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return fail("only lowercase letters, digits, '-' and '.' are allowed");
    }
    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(name.chars().next()) || !edge_ok(name.chars().last()) {
        return fail("must start and end with a letter or digit");
    }
    if name.contains("..") {
        return fail("must not contain consecutive dots");
    }
    Ok(())
}

/// `arn:<partition>:cloudfront::<account>:distribution/<id>`
pub fn validate_distribution_arn(arn: &str) -> Result<(), PolicyValidationError> {
    let malformed = || PolicyValidationError::MalformedDistributionArn(arn.to_string());

    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    let &[prefix, partition, service, region, account, resource] = parts.as_slice() else {
        return Err(malformed());
    };

    let partition_ok = matches!(partition, "aws" | "aws-cn" | "aws-us-gov");
    let account_ok = account.len() == 12 && account.chars().all(|c| c.is_ascii_digit());
    let id_ok = resource
        .strip_prefix("distribution/")
        .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()));

    if prefix == "arn"
        && partition_ok
        && service == "cloudfront"
        && region.is_empty()
        && account_ok
        && id_ok
    {
        Ok(())
    } else {
        Err(malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:cloudfront::123456789012:distribution/E2QWRUHAPOMQZL";

    #[test]
    fn fully_restrictive_sets_every_flag() {
        let pab = PublicAccessBlock::fully_restrictive();
        assert!(pab.block_public_acls);
        assert!(pab.ignore_public_acls);
        assert!(pab.block_public_policy);
        assert!(pab.restrict_public_buckets);
        assert!(!PublicAccessBlock::default().is_fully_restrictive());
    }

    #[test]
    fn policy_pins_source_arn() {
        let policy = PolicyDocument::cdn_read_only("my-site", ARN).unwrap();
        assert_eq!(policy.statement.len(), 1);
        assert_eq!(policy.source_arn(), Some(ARN));
        assert_eq!(policy.statement[0].resource, "arn:aws:s3:::my-site/*");
        assert_eq!(policy.statement[0].principal.service, CDN_SERVICE_PRINCIPAL);
    }

    #[test]
    fn policy_json_shape() {
        let policy = PolicyDocument::cdn_read_only("my-site", ARN).unwrap();
        insta::assert_snapshot!(policy.to_json(), @r#"
        {
          "Version": "2012-10-17",
          "Statement": [
            {
              "Sid": "AllowCloudFrontServicePrincipalReadOnly",
              "Effect": "Allow",
              "Principal": {
                "Service": "cloudfront.amazonaws.com"
              },
              "Action": "s3:GetObject",
              "Resource": "arn:aws:s3:::my-site/*",
              "Condition": {
                "StringEquals": {
                  "AWS:SourceArn": "arn:aws:cloudfront::123456789012:distribution/E2QWRUHAPOMQZL"
                }
              }
            }
          ]
        }
        "#);
    }

    #[test]
    fn matches_json_ignores_formatting() {
        let policy = PolicyDocument::cdn_read_only("my-site", ARN).unwrap();
        let compact = serde_json::to_string(&policy).unwrap();
        assert!(policy.matches_json(&compact));
        assert!(!policy.matches_json("{}"));
        assert!(!policy.matches_json("not json"));
    }

    #[test]
    fn foreign_distribution_does_not_match() {
        let ours = PolicyDocument::cdn_read_only("my-site", ARN).unwrap();
        let theirs = PolicyDocument::cdn_read_only(
            "my-site",
            "arn:aws:cloudfront::123456789012:distribution/EOTHER",
        )
        .unwrap();
        assert!(!ours.matches_json(&theirs.to_json()));
    }

    #[test]
    fn rejects_bad_bucket_names() {
        for name in ["ab", "My-Site", "-site", "site-", "a..b", "under_score"] {
            assert!(
                validate_bucket_name(name).is_err(),
                "expected '{name}' to be rejected"
            );
        }
        assert!(validate_bucket_name("my.site-2024").is_ok());
    }

    #[test]
    fn rejects_malformed_arns() {
        for arn in [
            "",
            "arn:aws:s3:::my-site",
            "arn:aws:cloudfront::12345:distribution/E1",
            "arn:aws:cloudfront:us-east-1:123456789012:distribution/E1",
            "arn:aws:cloudfront::123456789012:distribution/",
        ] {
            assert!(
                validate_distribution_arn(arn).is_err(),
                "expected '{arn}' to be rejected"
            );
        }
        assert!(validate_distribution_arn(ARN).is_ok());
    }
}
