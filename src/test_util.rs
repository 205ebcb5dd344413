//! Canned AWS responses for unit tests.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::config::Credentials;
use aws_smithy_http_client::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_types::body::SdkBody;
use aws_types::SdkConfig;

/// SDK configuration whose HTTP client replays `events` in order.
pub async fn replay_sdk_config(events: Vec<ReplayEvent>) -> (SdkConfig, StaticReplayClient) {
    let replay = StaticReplayClient::new(events);
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new(
            "ATESTCLIENT",
            "atestsecretkey",
            Some("atestsessiontoken".to_string()),
            None,
            "tests",
        ))
        .http_client(replay.clone())
        .load()
        .await;

    (sdk_config, replay)
}

/// 200 response carrying an XML body.
pub fn xml_event(body: &str) -> ReplayEvent {
    status_event(200, body)
}

/// Response with an arbitrary status code.
pub fn status_event(status: u16, body: &str) -> ReplayEvent {
    ReplayEvent::new(
        http::Request::builder()
            .uri("https://example.amazonaws.com/")
            .body(SdkBody::empty())
            .unwrap(),
        http::Response::builder()
            .status(status)
            .header("content-type", "text/xml")
            .body(SdkBody::from(body.to_string()))
            .unwrap(),
    )
}

// IAM

const IAM_NS: &str = "https://iam.amazonaws.com/doc/2010-05-08/";

pub fn get_user() -> String {
    format!(
        r#"<GetUserResponse xmlns="{IAM_NS}">
  <GetUserResult>
<User>
  <Path>/</Path>
  <UserName>alice</UserName>
  <UserId>AIDAEXAMPLE</UserId>
  <Arn>arn:aws:iam::123456789012:user/alice</Arn>
  <CreateDate>2020-01-01T00:00:00Z</CreateDate>
</User>
  </GetUserResult>
  <ResponseMetadata><RequestId>req-user</RequestId></ResponseMetadata>
</GetUserResponse>"#
    )
}

pub fn list_groups(groups: &[&str]) -> String {
    let members: String = groups
        .iter()
        .map(|g| {
            format!(
                "<member><Path>/</Path><GroupName>{g}</GroupName><GroupId>AGPA{g}</GroupId>\
                 <Arn>arn:aws:iam::123456789012:group/{g}</Arn>\
                 <CreateDate>2020-01-01T00:00:00Z</CreateDate></member>"
            )
        })
        .collect();
    format!(
        r#"<ListGroupsForUserResponse xmlns="{IAM_NS}">
  <ListGroupsForUserResult>
<Groups>{members}</Groups>
<IsTruncated>false</IsTruncated>
  </ListGroupsForUserResult>
  <ResponseMetadata><RequestId>req-groups</RequestId></ResponseMetadata>
</ListGroupsForUserResponse>"#
    )
}

pub fn list_attached(policies: &[&str]) -> String {
    let members: String = policies
        .iter()
        .map(|p| {
            format!(
                "<member><PolicyName>{p}</PolicyName>\
                 <PolicyArn>arn:aws:iam::123456789012:policy/{p}</PolicyArn></member>"
            )
        })
        .collect();
    format!(
        r#"<ListAttachedGroupPoliciesResponse xmlns="{IAM_NS}">
  <ListAttachedGroupPoliciesResult>
<AttachedPolicies>{members}</AttachedPolicies>
<IsTruncated>false</IsTruncated>
  </ListAttachedGroupPoliciesResult>
  <ResponseMetadata><RequestId>req-attached</RequestId></ResponseMetadata>
</ListAttachedGroupPoliciesResponse>"#
    )
}

pub fn get_policy(name: &str) -> String {
    format!(
        r#"<GetPolicyResponse xmlns="{IAM_NS}">
  <GetPolicyResult>
<Policy>
  <PolicyName>{name}</PolicyName>
  <Arn>arn:aws:iam::123456789012:policy/{name}</Arn>
  <DefaultVersionId>v3</DefaultVersionId>
</Policy>
  </GetPolicyResult>
  <ResponseMetadata><RequestId>req-policy</RequestId></ResponseMetadata>
</GetPolicyResponse>"#
    )
}

pub fn get_policy_version(document: &str) -> String {
    let encoded = urlencoding::encode(document);
    format!(
        r#"<GetPolicyVersionResponse xmlns="{IAM_NS}">
  <GetPolicyVersionResult>
<PolicyVersion>
  <Document>{encoded}</Document>
  <VersionId>v3</VersionId>
  <IsDefaultVersion>true</IsDefaultVersion>
</PolicyVersion>
  </GetPolicyVersionResult>
  <ResponseMetadata><RequestId>req-version</RequestId></ResponseMetadata>
</GetPolicyVersionResponse>"#
    )
}

pub fn assume_role_document(account: &str, role: &str) -> String {
    format!(
        r#"{{"Version":"2012-10-17","Statement":[{{"Effect":"Allow","Action":["sts:AssumeRole"],"Resource":"arn:aws:iam::{account}:role/{role}"}}]}}"#
    )
}

// EC2

pub fn describe_instances(items: &str, next_token: Option<&str>) -> String {
    let token = next_token
        .map(|t| format!("<nextToken>{}</nextToken>", t))
        .unwrap_or_default();
    format!(
        r#"<DescribeInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
  <requestId>req-instances</requestId>
  <reservationSet>
<item>
  <reservationId>r-1</reservationId>
  <instancesSet>{items}</instancesSet>
</item>
  </reservationSet>
  {token}
</DescribeInstancesResponse>"#
    )
}

pub fn instance_item(id: &str, name: Option<&str>, state: &str, ip: Option<&str>) -> String {
    let tags = name
        .map(|n| {
            format!(
                "<tagSet><item><key>env</key><value>prod</value></item>\
                 <item><key>Name</key><value>{}</value></item></tagSet>",
                n
            )
        })
        .unwrap_or_default();
    let ip = ip
        .map(|ip| format!("<ipAddress>{}</ipAddress>", ip))
        .unwrap_or_default();
    format!(
        "<item><instanceId>{id}</instanceId>\
         <instanceState><code>16</code><name>{state}</name></instanceState>\
         {ip}{tags}</item>"
    )
}

// STS

pub fn assume_role_response(access_key_id: &str, account: &str, role: &str) -> String {
    format!(
        r#"<AssumeRoleResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <AssumeRoleResult>
    <Credentials>
      <AccessKeyId>{access_key_id}</AccessKeyId>
      <SecretAccessKey>secret</SecretAccessKey>
      <SessionToken>token</SessionToken>
      <Expiration>2030-01-01T00:00:00Z</Expiration>
    </Credentials>
    <AssumedRoleUser>
      <AssumedRoleId>AROAEXAMPLE:aws-commands</AssumedRoleId>
      <Arn>arn:aws:sts::{account}:assumed-role/{role}/aws-commands</Arn>
    </AssumedRoleUser>
  </AssumeRoleResult>
  <ResponseMetadata><RequestId>req-assume</RequestId></ResponseMetadata>
</AssumeRoleResponse>"#
    )
}
