//! Security groups and their ingress rules.

use crate::client::{empty_on_not_found, none_on_not_found, Ec2Client, FormRequest};
use crate::domain::{IpPermission, IpProtocol, SecurityGroup, UserIdGroupPair};
use crate::errors::Ec2Error;
use crate::handlers::security_group::DescribeSecurityGroupsHandler;
use crate::handlers::ReturnHandler;

pub struct SecurityGroupApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> SecurityGroupApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn create_security_group_in_region(
        &self,
        region: Option<&str>,
        group_name: &str,
        description: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("CreateSecurityGroup")
            .param("GroupName", group_name)
            .param("GroupDescription", description);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Deleting a group that does not exist succeeds.
    pub async fn delete_security_group_in_region(
        &self,
        region: Option<&str>,
        group_name: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeleteSecurityGroup").param("GroupName", group_name);
        none_on_not_found(self.client.execute(region, request, ReturnHandler).await).map(|_| ())
    }

    pub async fn describe_security_groups_in_region(
        &self,
        region: Option<&str>,
        group_names: &[&str],
    ) -> Result<Vec<SecurityGroup>, Ec2Error> {
        let request = FormRequest::new("DescribeSecurityGroups").indexed("GroupName", group_names);
        let handler = DescribeSecurityGroupsHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    /// Allow traffic from members of another group.
    pub async fn authorize_security_group_ingress_from_group(
        &self,
        region: Option<&str>,
        group_name: &str,
        source: &UserIdGroupPair,
    ) -> Result<(), Ec2Error> {
        let request = group_source_request("AuthorizeSecurityGroupIngress", group_name, source);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Allow `protocol` traffic on `from_port..=to_port` from `cidr`.
    pub async fn authorize_security_group_ingress(
        &self,
        region: Option<&str>,
        group_name: &str,
        protocol: &IpProtocol,
        from_port: i32,
        to_port: i32,
        cidr: &str,
    ) -> Result<(), Ec2Error> {
        let request = cidr_request(
            "AuthorizeSecurityGroupIngress",
            group_name,
            protocol,
            from_port,
            to_port,
            cidr,
        );
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn revoke_security_group_ingress_from_group(
        &self,
        region: Option<&str>,
        group_name: &str,
        source: &UserIdGroupPair,
    ) -> Result<(), Ec2Error> {
        let request = group_source_request("RevokeSecurityGroupIngress", group_name, source);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn revoke_security_group_ingress(
        &self,
        region: Option<&str>,
        group_name: &str,
        protocol: &IpProtocol,
        from_port: i32,
        to_port: i32,
        cidr: &str,
    ) -> Result<(), Ec2Error> {
        let request = cidr_request(
            "RevokeSecurityGroupIngress",
            group_name,
            protocol,
            from_port,
            to_port,
            cidr,
        );
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Add structured rules to the group with id `group_id`.
    pub async fn authorize_ip_permissions_in_region(
        &self,
        region: Option<&str>,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), Ec2Error> {
        let request = ip_permissions_request("AuthorizeSecurityGroupIngress", group_id, permissions);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn revoke_ip_permissions_in_region(
        &self,
        region: Option<&str>,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), Ec2Error> {
        let request = ip_permissions_request("RevokeSecurityGroupIngress", group_id, permissions);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn group_source_request(action: &str, group_name: &str, source: &UserIdGroupPair) -> FormRequest {
    let mut request = FormRequest::new(action).param("GroupName", group_name);
    if let Some(owner) = &source.user_id {
        request = request.param("SourceSecurityGroupOwnerId", owner);
    }
    if let Some(name) = &source.group_name {
        request = request.param("SourceSecurityGroupName", name);
    }
    request
}

fn cidr_request(
    action: &str,
    group_name: &str,
    protocol: &IpProtocol,
    from_port: i32,
    to_port: i32,
    cidr: &str,
) -> FormRequest {
    FormRequest::new(action)
        .param("GroupName", group_name)
        .param("IpProtocol", protocol.as_wire())
        .param("FromPort", from_port.to_string())
        .param("ToPort", to_port.to_string())
        .param("CidrIp", cidr)
}

fn ip_permissions_request(action: &str, group_id: &str, permissions: &[IpPermission]) -> FormRequest {
    let mut request = FormRequest::new(action).param("GroupId", group_id);
    for (i, permission) in permissions.iter().enumerate() {
        let prefix = format!("IpPermissions.{}", i + 1);
        request = request
            .param(format!("{prefix}.IpProtocol"), permission.ip_protocol.as_wire())
            .param(format!("{prefix}.FromPort"), permission.from_port.to_string())
            .param(format!("{prefix}.ToPort"), permission.to_port.to_string());
        for (j, pair) in permission.groups.iter().enumerate() {
            let group = format!("{prefix}.Groups.{}", j + 1);
            if let Some(user_id) = &pair.user_id {
                request = request.param(format!("{group}.UserId"), user_id);
            }
            if let Some(group_id) = &pair.group_id {
                request = request.param(format!("{group}.GroupId"), group_id);
            }
            if let Some(group_name) = &pair.group_name {
                request = request.param(format!("{group}.GroupName"), group_name);
            }
        }
        for (j, cidr) in permission.cidr_blocks.iter().enumerate() {
            request = request.param(format!("{prefix}.IpRanges.{}.CidrIp", j + 1), cidr);
        }
    }
    request
}
