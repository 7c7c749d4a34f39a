// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scheduler plugins a computer can be set up with.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerType {
    Direct,
    Torque,
    PbsPro,
    Slurm,
    Sge,
    Lsf,
}

/// How a scheduler describes job resources. Decides which placeholders an
/// mpirun command may reference.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum JobResourceKind {
    NodeNumber,
    ParEnv,
}

const NODE_NUMBER_FIELDS: &[&str] = &[
    "tot_num_mpiprocs",
    "num_machines",
    "num_mpiprocs_per_machine",
    "num_cores_per_machine",
    "num_cores_per_mpiproc",
];

const PAR_ENV_FIELDS: &[&str] = &["parallel_env", "tot_num_mpiprocs"];

impl JobResourceKind {
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            JobResourceKind::NodeNumber => NODE_NUMBER_FIELDS,
            JobResourceKind::ParEnv => PAR_ENV_FIELDS,
        }
    }
}

impl SchedulerType {
    pub const ALL: [SchedulerType; 6] = [
        SchedulerType::Direct,
        SchedulerType::Torque,
        SchedulerType::PbsPro,
        SchedulerType::Slurm,
        SchedulerType::Sge,
        SchedulerType::Lsf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerType::Direct => "direct",
            SchedulerType::Torque => "torque",
            SchedulerType::PbsPro => "pbspro",
            SchedulerType::Slurm => "slurm",
            SchedulerType::Sge => "sge",
            SchedulerType::Lsf => "lsf",
        }
    }

    pub fn job_resource_kind(self) -> JobResourceKind {
        match self {
            SchedulerType::Sge => JobResourceKind::ParEnv,
            _ => JobResourceKind::NodeNumber,
        }
    }

    /// Binary that must be on PATH for the scheduler to accept submissions.
    pub fn submit_command(self) -> &'static str {
        match self {
            SchedulerType::Direct => "sh",
            SchedulerType::Torque | SchedulerType::PbsPro | SchedulerType::Sge => "qsub",
            SchedulerType::Slurm => "sbatch",
            SchedulerType::Lsf => "bsub",
        }
    }
}

impl fmt::Display for SchedulerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "direct" => Ok(Self::Direct),
            "torque" => Ok(Self::Torque),
            "pbspro" => Ok(Self::PbsPro),
            "slurm" => Ok(Self::Slurm),
            "sge" => Ok(Self::Sge),
            "lsf" => Ok(Self::Lsf),
            other => Err(format!("'{other}' is not valid")),
        }
    }
}
