/*!
Constants defined in the AWS Documentation.

# Condition Context Keys

When a principal makes a request to AWS, AWS gathers the request information into a
request context. You can use the Condition element of a JSON policy to compare the
request context with values that you specify in your policy.

From [AWS Global Condition Context Keys](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_condition-keys.html).

Only the keys this crate's own tests and examples reference are kept; the full catalog is an
open-set enumeration this engine never validates against (see `model::condition`).
*/

/// Use this key to compare the identifier of the organization in AWS Organizations to which the
/// requesting principal belongs with the identifier specified in the policy.
pub const AWS_PRINCIPAL_ORG_ID: &str = "aws:PrincipalOrgID";

/// Use this key to compare the tag key-value pair that was passed in the request with the tag
/// pair that you specify in the policy.
pub const AWS_REQUEST_TAG: &str = "aws:RequestTag/";

/// Use this key to compare the tag key-value pair that you specify in the policy with the
/// key-value pair that is attached to the resource.
pub const AWS_RESOURCE_TAG: &str = "aws:ResourceTag/";

/// Use this key to check whether the request was sent using SSL.
pub const AWS_SECURE_TRANSPORT: &str = "aws:SecureTransport";

/// Use this key to compare the requester's IP address with the IP address that you specify in
/// the policy.
pub const AWS_SOURCE_IP: &str = "aws:SourceIp";

/// Use this key to compare the account to which the requesting principal belongs with the
/// account identifier that you specify in the policy.
pub const AWS_PRINCIPAL_ACCOUNT: &str = "aws:PrincipalAccount";
