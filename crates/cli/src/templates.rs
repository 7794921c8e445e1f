// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in starter templates
//!
//! Each template is a complete, documented pipeline a user can run
//! after filling in their project specifics.

pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    pub content: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "innosetup",
        description: "Build a .NET app and compile an Inno Setup installer",
        content: INNOSETUP,
    },
    Template {
        name: "dotnet",
        description: "Restore, build, test and publish a .NET solution",
        content: DOTNET,
    },
    Template {
        name: "security",
        description: "Dependency, secret and license scanning",
        content: SECURITY,
    },
    Template {
        name: "twincat",
        description: "Build and check a TwinCAT PLC project",
        content: TWINCAT,
    },
    Template {
        name: "custom",
        description: "Annotated skeleton explaining every available key",
        content: CUSTOM,
    },
];

/// Look up a template by name.
pub fn find(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name == name)
}

const INNOSETUP: &str = r#"# Inno Setup installer pipeline.
# Builds a .NET application, compiles an installer with ISCC and keeps
# the setup executable as an artifact.
version: 1
name: Installer Build
variables:
  APP_NAME: MyApp
  CONFIGURATION: Release
  # Path to the Inno Setup 6 compiler.
  ISCC: "C:/Program Files (x86)/Inno Setup 6/ISCC.exe"
stages:
  - name: build
    steps:
      - name: Publish
        description: Publish the application for packaging
        command: dotnet
        arguments: publish ${APP_NAME}/${APP_NAME}.csproj -c ${CONFIGURATION} -o publish
        timeout_seconds: 600
  - name: installer
    steps:
      - name: Compile Installer
        description: Compile the Inno Setup script
        command: "${ISCC}"
        arguments: installer/${APP_NAME}.iss /DAppVersion=1.0.0
        # Pause here when compilation fails so the script can be inspected.
        breakpoint: on_failure
        artifacts:
          - installer/Output/*.exe
  - name: verify
    steps:
      - name: Smoke Test Installer
        command: installer/Output/${APP_NAME}-setup.exe
        arguments: /VERYSILENT /SUPPRESSMSGBOXES /DIR=smoke-install
        allow_failure: true
"#;

const DOTNET: &str = r#"# .NET build pipeline: restore, build, test, publish.
version: 1
name: DotNet Build
variables:
  CONFIGURATION: Release
  SOLUTION: MySolution.sln
  # Set truthy (e.g. "1") to enable the publish stage.
  PUBLISH: ""
watch:
  # Re-run on source changes while developing: pipeforge run -w
  - path: src
    filter: "*.cs"
    include_subdirectories: true
    debounce_ms: 1000
stages:
  - name: restore
    steps:
      - name: Restore
        command: dotnet
        arguments: restore ${SOLUTION}
  - name: build
    steps:
      - name: Build
        command: dotnet
        arguments: build ${SOLUTION} -c ${CONFIGURATION} --no-restore
  - name: test
    steps:
      - name: Test
        command: dotnet
        arguments: test ${SOLUTION} -c ${CONFIGURATION} --no-build --logger trx
        timeout_seconds: 900
        artifacts:
          - "**/TestResults/*.trx"
  - name: publish
    condition:
      # Only runs when the PUBLISH variable above is set truthy.
      only_if: PUBLISH
    steps:
      - name: Publish
        command: dotnet
        arguments: publish ${SOLUTION} -c ${CONFIGURATION} -o publish
        artifacts:
          - publish/**/*
"#;

const SECURITY: &str = r#"# Security scanning pipeline.
# Every scanner runs even if an earlier one finds problems; the run
# still ends Failed when any of them does.
version: 1
name: Security Scan
stages:
  - name: scan
    continue_on_error: true
    steps:
      - name: Vulnerable Packages
        description: Known-vulnerable NuGet dependencies
        command: dotnet
        arguments: list package --vulnerable --include-transitive
      - name: Secret Scan
        description: Committed credentials and tokens
        command: gitleaks
        arguments: detect --no-banner --report-path gitleaks-report.json
        artifacts:
          - gitleaks-report.json
      - name: License Check
        command: dotnet
        arguments: list package --include-transitive
        allow_failure: true
  - name: report
    steps:
      - name: Summarize
        command: echo
        arguments: Scan complete, inspect reports above
"#;

const TWINCAT: &str = r#"# TwinCAT PLC build pipeline.
# Drives the TwinCAT Automation Interface through a PowerShell script
# to build the PLC project headlessly.
version: 1
name: TwinCAT Build
variables:
  PROJECT: Plc/MyMachine.sln
  TC_VERSION: "3.1.4024"
watch:
  - path: Plc
    filter: "*.TcPOU"
    include_subdirectories: true
    debounce_ms: 2000
stages:
  - name: build
    steps:
      - name: Build PLC
        description: Headless build via the Automation Interface
        command: powershell
        arguments: -NoProfile -File scripts/build-plc.ps1 -Solution ${PROJECT} -TcVersion ${TC_VERSION}
        timeout_seconds: 1200
        # A failed PLC build is worth inspecting interactively.
        breakpoint: on_failure
  - name: check
    steps:
      - name: Static Analysis
        command: powershell
        arguments: -NoProfile -File scripts/run-static-analysis.ps1 -Solution ${PROJECT}
        allow_failure: true
        artifacts:
          - Plc/_Analysis/*.xml
"#;

const CUSTOM: &str = r#"# PipeForge pipeline - annotated skeleton.
#
# A pipeline is an ordered list of stages, each an ordered list of
# steps. Steps run strictly one after another; a failing step stops the
# run unless told otherwise.
version: 1
name: My Pipeline
description: What this pipeline does
# Base directory for every step ("." if omitted; ~ expands).
working_directory: .
# Variables usable as ${NAME} in commands, arguments, paths and
# artifact patterns. PIPEFORGE_WORK_DIR, PIPEFORGE_RUN_ID and
# PIPEFORGE_PIPELINE are always available.
variables:
  GREETING: hello
# Watch mode (pipeforge run -w) re-runs the pipeline when files change.
watch:
  - path: .            # where to watch
    filter: "*.*"      # glob matched against file names
    include_subdirectories: false
    debounce_ms: 500   # quiet time before the trigger fires
stages:
  - name: example
    # Uncomment to keep going past failed steps in this stage:
    # continue_on_error: true
    # Conditions gate the whole stage:
    # condition:
    #   only_if: SOME_VARIABLE   # must be set and truthy
    #   files_exist:
    #     - required-input.txt
    steps:
      - name: Say Hello
        description: Minimal step
        command: echo
        arguments: ${GREETING} from PipeForge
        # Extra environment for this step only (values resolve ${VAR}):
        # environment:
        #   TOOL_HOME: /opt/tool
        # Seconds before the step is killed (default 300):
        timeout_seconds: 60
        # Keep going even if this step fails:
        # allow_failure: true
        # Files to record as artifacts after the step:
        # artifacts:
        #   - dist/*.zip
        # Pause for a debug verdict: never / always / on_failure
        # breakpoint: never
"#;

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
