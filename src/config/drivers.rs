//! Driver flags that can be passed straight through on the command line

use super::{MachineOption, OptionSet};
use crate::error::Result;
use clap::Args;

/// Drivers with enumerated command-line flags
pub const SUPPORTED_DRIVERS: &[&str] = &["amazonec2", "digitalocean"];

fn push_value(out: &mut Vec<MachineOption>, flag: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push(MachineOption::value(flag, value));
    }
}

fn push_switch(out: &mut Vec<MachineOption>, flag: &str, enabled: bool) {
    if enabled {
        out.push(MachineOption::switch(flag));
    }
}

/// Amazon EC2 driver flags
#[derive(Args, Debug, Clone, Default)]
pub struct Amazonec2Args {
    #[arg(id = "amazonec2-access-key", long = "amazonec2-access-key", value_name = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,
    #[arg(id = "amazonec2-secret-key", long = "amazonec2-secret-key", value_name = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,
    #[arg(id = "amazonec2-session-token", long = "amazonec2-session-token", value_name = "AWS_SESSION_TOKEN")]
    pub session_token: Option<String>,
    #[arg(id = "amazonec2-ami", long = "amazonec2-ami", value_name = "AWS_AMI")]
    pub ami: Option<String>,
    #[arg(id = "amazonec2-region", long = "amazonec2-region", value_name = "AWS_DEFAULT_REGION")]
    pub region: Option<String>,
    #[arg(id = "amazonec2-vpc-id", long = "amazonec2-vpc-id", value_name = "AWS_VPC_ID")]
    pub vpc_id: Option<String>,
    #[arg(id = "amazonec2-zone", long = "amazonec2-zone", value_name = "AWS_ZONE")]
    pub zone: Option<String>,
    #[arg(id = "amazonec2-subnet-id", long = "amazonec2-subnet-id", value_name = "AWS_SUBNET_ID")]
    pub subnet_id: Option<String>,
    /// Security group with the swarm ports (2377, 7946, 4789) open
    #[arg(id = "amazonec2-security-group", long = "amazonec2-security-group", value_name = "AWS_SECURITY_GROUP")]
    pub security_group: Option<String>,
    #[arg(id = "amazonec2-tags", long = "amazonec2-tags", value_name = "AWS_TAGS")]
    pub tags: Option<String>,
    #[arg(id = "amazonec2-instance-type", long = "amazonec2-instance-type", value_name = "AWS_INSTANCE_TYPE")]
    pub instance_type: Option<String>,
    #[arg(id = "amazonec2-device-name", long = "amazonec2-device-name", value_name = "AWS_DEVICE_NAME")]
    pub device_name: Option<String>,
    #[arg(id = "amazonec2-root-size", long = "amazonec2-root-size", value_name = "AWS_ROOT_SIZE")]
    pub root_size: Option<String>,
    #[arg(id = "amazonec2-volume-type", long = "amazonec2-volume-type", value_name = "AWS_VOLUME_TYPE")]
    pub volume_type: Option<String>,
    #[arg(id = "amazonec2-iam-instance-profile", long = "amazonec2-iam-instance-profile", value_name = "AWS_INSTANCE_PROFILE")]
    pub iam_instance_profile: Option<String>,
    #[arg(id = "amazonec2-ssh-user", long = "amazonec2-ssh-user", value_name = "AWS_SSH_USER")]
    pub ssh_user: Option<String>,
    #[arg(id = "amazonec2-ssh-keypath", long = "amazonec2-ssh-keypath", value_name = "AWS_SSH_KEYPATH")]
    pub ssh_keypath: Option<String>,
    #[arg(id = "amazonec2-spot-price", long = "amazonec2-spot-price", value_name = "PRICE")]
    pub spot_price: Option<String>,
    #[arg(id = "amazonec2-retries", long = "amazonec2-retries", value_name = "COUNT")]
    pub retries: Option<String>,
    #[arg(id = "amazonec2-request-spot-instance", long = "amazonec2-request-spot-instance")]
    pub request_spot_instance: bool,
    #[arg(id = "amazonec2-use-private-address", long = "amazonec2-use-private-address")]
    pub use_private_address: bool,
    #[arg(id = "amazonec2-private-address-only", long = "amazonec2-private-address-only")]
    pub private_address_only: bool,
    #[arg(id = "amazonec2-monitoring", long = "amazonec2-monitoring")]
    pub monitoring: bool,
    #[arg(id = "amazonec2-use-ebs-optimized-instance", long = "amazonec2-use-ebs-optimized-instance")]
    pub use_ebs_optimized_instance: bool,
}

impl Amazonec2Args {
    pub fn options(&self) -> Vec<MachineOption> {
        let mut out = Vec::new();
        push_value(&mut out, "--amazonec2-access-key", &self.access_key);
        push_value(&mut out, "--amazonec2-secret-key", &self.secret_key);
        push_value(&mut out, "--amazonec2-session-token", &self.session_token);
        push_value(&mut out, "--amazonec2-ami", &self.ami);
        push_value(&mut out, "--amazonec2-region", &self.region);
        push_value(&mut out, "--amazonec2-vpc-id", &self.vpc_id);
        push_value(&mut out, "--amazonec2-zone", &self.zone);
        push_value(&mut out, "--amazonec2-subnet-id", &self.subnet_id);
        push_value(&mut out, "--amazonec2-security-group", &self.security_group);
        push_value(&mut out, "--amazonec2-tags", &self.tags);
        push_value(&mut out, "--amazonec2-instance-type", &self.instance_type);
        push_value(&mut out, "--amazonec2-device-name", &self.device_name);
        push_value(&mut out, "--amazonec2-root-size", &self.root_size);
        push_value(&mut out, "--amazonec2-volume-type", &self.volume_type);
        push_value(
            &mut out,
            "--amazonec2-iam-instance-profile",
            &self.iam_instance_profile,
        );
        push_value(&mut out, "--amazonec2-ssh-user", &self.ssh_user);
        push_value(&mut out, "--amazonec2-ssh-keypath", &self.ssh_keypath);
        push_value(&mut out, "--amazonec2-spot-price", &self.spot_price);
        push_value(&mut out, "--amazonec2-retries", &self.retries);
        push_switch(
            &mut out,
            "--amazonec2-request-spot-instance",
            self.request_spot_instance,
        );
        push_switch(
            &mut out,
            "--amazonec2-use-private-address",
            self.use_private_address,
        );
        push_switch(
            &mut out,
            "--amazonec2-private-address-only",
            self.private_address_only,
        );
        push_switch(&mut out, "--amazonec2-monitoring", self.monitoring);
        push_switch(
            &mut out,
            "--amazonec2-use-ebs-optimized-instance",
            self.use_ebs_optimized_instance,
        );
        out
    }
}

/// DigitalOcean driver flags
#[derive(Args, Debug, Clone, Default)]
pub struct DigitalOceanArgs {
    #[arg(id = "digitalocean-access-token", long = "digitalocean-access-token", value_name = "DIGITALOCEAN_ACCESS_TOKEN")]
    pub access_token: Option<String>,
    #[arg(id = "digitalocean-image", long = "digitalocean-image", value_name = "DIGITALOCEAN_IMAGE")]
    pub image: Option<String>,
    #[arg(id = "digitalocean-region", long = "digitalocean-region", value_name = "DIGITALOCEAN_REGION")]
    pub region: Option<String>,
    #[arg(id = "digitalocean-size", long = "digitalocean-size", value_name = "DIGITALOCEAN_SIZE")]
    pub size: Option<String>,
    #[arg(id = "digitalocean-ssh-user", long = "digitalocean-ssh-user", value_name = "DIGITALOCEAN_SSH_USER")]
    pub ssh_user: Option<String>,
    #[arg(
        id = "digitalocean-ssh-key-fingerprint",
        long = "digitalocean-ssh-key-fingerprint",
        value_name = "DIGITALOCEAN_SSH_KEY_FINGERPRINT"
    )]
    pub ssh_key_fingerprint: Option<String>,
    #[arg(id = "digitalocean-tags", long = "digitalocean-tags", value_name = "DIGITALOCEAN_TAGS")]
    pub tags: Option<String>,
    #[arg(id = "digitalocean-ipv6", long = "digitalocean-ipv6")]
    pub ipv6: bool,
    #[arg(id = "digitalocean-private-networking", long = "digitalocean-private-networking")]
    pub private_networking: bool,
    #[arg(id = "digitalocean-backups", long = "digitalocean-backups")]
    pub backups: bool,
    #[arg(id = "digitalocean-monitoring", long = "digitalocean-monitoring")]
    pub monitoring: bool,
}

impl DigitalOceanArgs {
    pub fn options(&self) -> Vec<MachineOption> {
        let mut out = Vec::new();
        push_value(&mut out, "--digitalocean-access-token", &self.access_token);
        push_value(&mut out, "--digitalocean-image", &self.image);
        push_value(&mut out, "--digitalocean-region", &self.region);
        push_value(&mut out, "--digitalocean-size", &self.size);
        push_value(&mut out, "--digitalocean-ssh-user", &self.ssh_user);
        push_value(
            &mut out,
            "--digitalocean-ssh-key-fingerprint",
            &self.ssh_key_fingerprint,
        );
        push_value(&mut out, "--digitalocean-tags", &self.tags);
        push_switch(&mut out, "--digitalocean-ipv6", self.ipv6);
        push_switch(
            &mut out,
            "--digitalocean-private-networking",
            self.private_networking,
        );
        push_switch(&mut out, "--digitalocean-backups", self.backups);
        push_switch(&mut out, "--digitalocean-monitoring", self.monitoring);
        out
    }
}

/// Every driver flag and the user config path, shared by the `create` and `machine` commands
#[derive(Args, Debug, Clone, Default)]
pub struct MachineArgs {
    /// docker-machine driver [default: amazonec2]
    #[arg(long, value_name = "DRIVER")]
    pub driver: Option<String>,

    /// Path to a YAML file with any of the driver flags
    #[arg(long, value_name = "USERCONFIG")]
    pub userconfig: Option<std::path::PathBuf>,

    #[command(flatten)]
    pub amazonec2: Amazonec2Args,

    #[command(flatten)]
    pub digitalocean: DigitalOceanArgs,
}

impl MachineArgs {
    /// Driver flags given on the command line, in declaration order
    pub fn cli_options(&self) -> Vec<MachineOption> {
        let mut out = self.amazonec2.options();
        out.extend(self.digitalocean.options());
        out
    }

    /// Load `--userconfig` (if given) and merge it with the command-line flags
    pub fn resolve(&self) -> Result<OptionSet> {
        let user_config = self
            .userconfig
            .as_deref()
            .map(super::load_user_config)
            .transpose()?;

        if let Some(config) = &user_config {
            tracing::info!(path = %config.path.display(), entries = config.entries.len(), "loaded user config");
        }

        let options =
            super::resolve_options(self.driver.as_deref(), &self.cli_options(), user_config.as_ref());

        if let Some(driver) = options.driver() {
            if !SUPPORTED_DRIVERS.contains(&driver) {
                tracing::warn!(driver, "no command-line flags for this driver, only --userconfig entries apply");
            }
        }

        Ok(options)
    }
}
