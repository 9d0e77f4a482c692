//! DescribeSecurityGroups.

use super::TagSetCollector;
use crate::domain::{IpPermission, IpProtocol, SecurityGroup, UserIdGroupPair};
use crate::xml::{non_empty, parse_number, ElementPath, SaxHandler, XmlError};

#[derive(Debug)]
pub struct DescribeSecurityGroupsHandler {
    region: String,
    groups: Vec<SecurityGroup>,
    current: SecurityGroup,
    permission: IpPermission,
    pair: UserIdGroupPair,
    tags: TagSetCollector,
}

impl DescribeSecurityGroupsHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: SecurityGroup {
                region: region.clone(),
                ..Default::default()
            },
            region,
            groups: Vec::new(),
            permission: unbounded_permission(),
            pair: UserIdGroupPair::default(),
            tags: TagSetCollector::default(),
        }
    }

    /// Fields of one rule in `ipPermissions` or `ipPermissionsEgress`.
    fn permission_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.contains("groups") {
            match path.current() {
                "userId" => self.pair.user_id = non_empty(text),
                "groupId" => self.pair.group_id = non_empty(text),
                "groupName" => self.pair.group_name = non_empty(text),
                "item" if path.parent() == "groups" => {
                    let pair = std::mem::take(&mut self.pair);
                    self.permission.groups.push(pair);
                }
                _ => {}
            }
            return Ok(());
        }
        match path.current() {
            "ipProtocol" => self.permission.ip_protocol = IpProtocol::from_wire(text),
            "fromPort" if !text.is_empty() => {
                self.permission.from_port = parse_number("fromPort", text)?
            }
            "toPort" if !text.is_empty() => self.permission.to_port = parse_number("toPort", text)?,
            "cidrIp" => self.permission.cidr_blocks.push(text.to_string()),
            "item" if path.parent() == "ipPermissions" => {
                let permission = std::mem::replace(&mut self.permission, unbounded_permission());
                self.current.ip_permissions.push(permission);
            }
            "item" if path.parent() == "ipPermissionsEgress" => {
                let permission = std::mem::replace(&mut self.permission, unbounded_permission());
                self.current.ip_permissions_egress.push(permission);
            }
            _ => {}
        }
        Ok(())
    }
}

/// A rule without ports covers every port.
fn unbounded_permission() -> IpPermission {
    IpPermission {
        from_port: -1,
        to_port: -1,
        ..Default::default()
    }
}

impl SaxHandler for DescribeSecurityGroupsHandler {
    type Output = Vec<SecurityGroup>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.contains("ipPermissions") || path.contains("ipPermissionsEgress") {
            return self.permission_element(path, text);
        }
        if path.ends_with(&["securityGroupInfo", "item"]) {
            let mut group = std::mem::replace(
                &mut self.current,
                SecurityGroup {
                    region: self.region.clone(),
                    ..Default::default()
                },
            );
            group.tags = self.tags.take();
            if group.name.is_empty() {
                return Err(XmlError::MissingElement("groupName".to_string()));
            }
            self.groups.push(group);
            return Ok(());
        }
        if path.parent() == "item" && path.ancestor(2) == "securityGroupInfo" {
            let group = &mut self.current;
            match path.current() {
                "ownerId" => group.owner_id = non_empty(text),
                "groupId" => group.id = non_empty(text),
                "groupName" => group.name = text.to_string(),
                "groupDescription" => group.description = non_empty(text),
                "vpcId" => group.vpc_id = non_empty(text),
                _ => {}
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<SecurityGroup>, XmlError> {
        Ok(self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_sax;

    const DESCRIBE_SECURITY_GROUPS: &str = r#"<DescribeSecurityGroupsResponse xmlns="http://ec2.amazonaws.com/doc/2011-05-15/">
  <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
  <securityGroupInfo>
    <item>
      <ownerId>999988887777</ownerId>
      <groupId>sg-443d0a12</groupId>
      <groupName>WebServers</groupName>
      <groupDescription>Web Servers</groupDescription>
      <ipPermissions>
        <item>
          <ipProtocol>tcp</ipProtocol>
          <fromPort>80</fromPort>
          <toPort>80</toPort>
          <groups/>
          <ipRanges><item><cidrIp>0.0.0.0/0</cidrIp></item></ipRanges>
        </item>
      </ipPermissions>
      <ipPermissionsEgress/>
    </item>
    <item>
      <ownerId>999988887777</ownerId>
      <groupId>sg-5ff8a023</groupId>
      <groupName>RangedPortsBySource</groupName>
      <groupDescription>Group A</groupDescription>
      <ipPermissions>
        <item>
          <ipProtocol>tcp</ipProtocol>
          <fromPort>6000</fromPort>
          <toPort>7000</toPort>
          <groups>
            <item><userId>999988887777</userId><groupId>sg-99gh4012</groupId><groupName>Group B</groupName></item>
          </groups>
          <ipRanges/>
        </item>
        <item>
          <ipProtocol>icmp</ipProtocol>
          <groups/>
          <ipRanges><item><cidrIp>10.0.0.0/8</cidrIp></item></ipRanges>
        </item>
      </ipPermissions>
      <tagSet><item><key>tier</key><value>web</value></item></tagSet>
    </item>
  </securityGroupInfo>
</DescribeSecurityGroupsResponse>"#;

    #[test]
    fn test_describe_security_groups() {
        let groups = parse_sax(
            DESCRIBE_SECURITY_GROUPS.as_bytes(),
            DescribeSecurityGroupsHandler::new("us-east-1"),
        )
        .unwrap();
        assert_eq!(groups.len(), 2);

        let web = &groups[0];
        assert_eq!(web.name, "WebServers");
        assert_eq!(web.id.as_deref(), Some("sg-443d0a12"));
        assert_eq!(web.description.as_deref(), Some("Web Servers"));
        assert_eq!(
            web.ip_permissions,
            vec![IpPermission {
                ip_protocol: IpProtocol::Tcp,
                from_port: 80,
                to_port: 80,
                groups: vec![],
                cidr_blocks: vec!["0.0.0.0/0".into()],
            }]
        );
        assert!(web.ip_permissions_egress.is_empty());

        let ranged = &groups[1];
        assert_eq!(ranged.ip_permissions.len(), 2);
        assert_eq!(
            ranged.ip_permissions[0].groups,
            vec![UserIdGroupPair {
                user_id: Some("999988887777".into()),
                group_name: Some("Group B".into()),
                group_id: Some("sg-99gh4012".into()),
            }]
        );
        let icmp = &ranged.ip_permissions[1];
        assert_eq!(icmp.ip_protocol, IpProtocol::Icmp);
        assert_eq!((icmp.from_port, icmp.to_port), (-1, -1));
        assert_eq!(ranged.tags.get("tier").map(String::as_str), Some("web"));
    }
}
