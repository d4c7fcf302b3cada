//! The command tree
//!
//! Every command lists the parameters of the management operation behind
//! it. Those parameters are the raw material the argument registry
//! decorates: the registry can rename, retype, hide or expand them, but
//! it cannot invent dests the table does not know about (except through
//! `extra`).

use serde::Serialize;

use crate::engine::Engine;
use crate::models::ModelType;
use crate::scope::Scope;
use crate::settings::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Create,
    Restore,
    Update,
    Delete,
    Show,
    List,
    Set,
    Download,
}

impl CommandKind {
    /// Commands acting on an existing resource also take `--ids`
    pub fn accepts_ids(&self) -> bool {
        matches!(
            self,
            CommandKind::Update | CommandKind::Delete | CommandKind::Show | CommandKind::Set
        )
    }
}

/// One parameter of a management operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub dest: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

impl ParamSpec {
    pub fn required(dest: &'static str) -> Self {
        Self {
            dest,
            value_type: ValueType::String,
            required: true,
            help: None,
        }
    }

    pub fn optional(dest: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(dest)
        }
    }

    #[must_use]
    pub fn of_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSpec {
    pub scope: Scope,
    pub kind: CommandKind,
    pub summary: &'static str,
    pub parameters: Vec<ParamSpec>,
}

impl CommandSpec {
    pub fn new(scope: Scope, kind: CommandKind, summary: &'static str) -> Self {
        Self {
            scope,
            kind,
            summary,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSpec {
    pub scope: Scope,
    pub summary: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandTable {
    groups: Vec<GroupSpec>,
    commands: Vec<CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full command tree for both engines
    pub fn standard() -> Self {
        let mut table = Self::new();
        for engine in Engine::ALL {
            register_engine(&mut table, engine);
        }
        table
    }

    pub fn add_group(&mut self, scope: Scope, summary: &'static str) {
        self.groups.push(GroupSpec { scope, summary });
    }

    pub fn add_command(&mut self, command: CommandSpec) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn command(&self, scope: &Scope) -> Option<&CommandSpec> {
        self.commands.iter().find(|command| &command.scope == scope)
    }

    pub fn group(&self, scope: &Scope) -> Option<&GroupSpec> {
        self.groups.iter().find(|group| &group.scope == scope)
    }

    /// True if some command lives at or below `scope`
    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.commands
            .iter()
            .any(|command| scope.covers(&command.scope))
    }

    pub fn commands_under<'a>(
        &'a self,
        scope: &'a Scope,
    ) -> impl Iterator<Item = &'a CommandSpec> {
        self.commands
            .iter()
            .filter(move |command| scope.covers(&command.scope))
    }

    /// Groups and commands exactly one level below `scope`, in table order
    pub fn children(&self, scope: &Scope) -> Vec<Scope> {
        let mut children: Vec<Scope> = Vec::new();
        let candidates = self
            .groups
            .iter()
            .map(|group| &group.scope)
            .chain(self.commands.iter().map(|command| &command.scope));
        for candidate in candidates {
            if candidate.parent().as_ref() == Some(scope) && !children.contains(candidate) {
                children.push(candidate.clone());
            }
        }
        children
    }

    /// Engines that have `path` below their root
    pub fn engines_with(&self, path: &[&str]) -> Vec<Engine> {
        Engine::ALL
            .into_iter()
            .filter(|engine| self.has_scope(&Scope::new(*engine, path)))
            .collect()
    }
}

fn resource_group() -> ParamSpec {
    ParamSpec::required("resource_group_name")
}

fn server_name() -> ParamSpec {
    ParamSpec::required("server_name")
}

fn int(dest: &'static str) -> ParamSpec {
    ParamSpec::optional(dest).of_type(ValueType::Int)
}

fn register_engine(table: &mut CommandTable, engine: Engine) {
    let root = Scope::engine(engine);
    let server = root.child("server");
    let firewall = server.child("firewall-rule");
    let vnet = server.child("vnet-rule");
    let configuration = server.child("configuration");
    let logs = root.child("server-logs");
    let db = root.child("db");

    let summary = match engine {
        Engine::MySql => "Manage Azure Database for MySQL servers.",
        Engine::Postgres => "Manage Azure Database for PostgreSQL servers.",
    };
    table.add_group(root.clone(), summary);
    table.add_group(server.clone(), "Manage servers.");
    table.add_group(firewall.clone(), "Manage firewall rules for a server.");
    table.add_group(
        configuration.clone(),
        "Manage configuration values for a server.",
    );
    table.add_group(logs.clone(), "Manage server logs.");
    table.add_group(db.clone(), "Manage databases on a server.");

    let server_for_create = ValueType::Object {
        model: ModelType::ServerForCreate,
    };

    // server
    table.add_command(
        CommandSpec::new(
            server.child("create"),
            CommandKind::Create,
            "Create a server.",
        )
        .param(resource_group())
        .param(server_name())
        .param(ParamSpec::required("parameters").of_type(server_for_create.clone())),
    );
    table.add_command(
        CommandSpec::new(
            server.child("restore"),
            CommandKind::Restore,
            "Restore a server from backup.",
        )
        .param(resource_group())
        .param(server_name())
        .param(ParamSpec::required("parameters").of_type(server_for_create)),
    );
    table.add_command(
        CommandSpec::new(
            server.child("update"),
            CommandKind::Update,
            "Update a server.",
        )
        .param(resource_group())
        .param(server_name())
        .param(int("capacity"))
        .param(int("storage_mb"))
        .param(ParamSpec::optional("administrator_login_password"))
        .param(ParamSpec::optional("ssl_enforcement"))
        .param(ParamSpec::optional("tags").of_type(ValueType::Dict)),
    );
    table.add_command(
        CommandSpec::new(
            server.child("delete"),
            CommandKind::Delete,
            "Delete a server.",
        )
        .param(resource_group())
        .param(server_name()),
    );
    table.add_command(
        CommandSpec::new(
            server.child("show"),
            CommandKind::Show,
            "Get the details of a server.",
        )
        .param(resource_group())
        .param(server_name()),
    );
    table.add_command(
        CommandSpec::new(
            server.child("list"),
            CommandKind::List,
            "List available servers.",
        )
        .param(ParamSpec::optional("resource_group_name")),
    );

    // server firewall-rule
    let firewall_rule = |kind, word: &str, summary| {
        CommandSpec::new(firewall.child(word), kind, summary)
            .param(resource_group())
            .param(server_name())
            .param(ParamSpec::required("firewall_rule_name"))
    };
    table.add_command(
        firewall_rule(CommandKind::Create, "create", "Create a firewall rule.")
            .param(ParamSpec::required("start_ip_address"))
            .param(ParamSpec::required("end_ip_address")),
    );
    table.add_command(
        firewall_rule(CommandKind::Update, "update", "Update a firewall rule.")
            .param(ParamSpec::optional("start_ip_address"))
            .param(ParamSpec::optional("end_ip_address")),
    );
    table.add_command(firewall_rule(
        CommandKind::Delete,
        "delete",
        "Delete a firewall rule.",
    ));
    table.add_command(firewall_rule(
        CommandKind::Show,
        "show",
        "Get the details of a firewall rule.",
    ));
    table.add_command(
        CommandSpec::new(
            firewall.child("list"),
            CommandKind::List,
            "List all firewall rules for a server.",
        )
        .param(resource_group())
        .param(server_name()),
    );

    // server vnet-rule, PostgreSQL only
    if engine == Engine::Postgres {
        table.add_group(vnet.clone(), "Manage a server's virtual network rules.");
        let vnet_rule = |kind, word: &str, summary| {
            CommandSpec::new(vnet.child(word), kind, summary)
                .param(resource_group())
                .param(server_name())
                .param(ParamSpec::required("virtual_network_rule_name"))
        };
        table.add_command(
            vnet_rule(
                CommandKind::Create,
                "create",
                "Create a virtual network rule to allows access to a PostgreSQL server.",
            )
            .param(ParamSpec::required("virtual_network_subnet_id")),
        );
        table.add_command(
            vnet_rule(
                CommandKind::Update,
                "update",
                "Update a virtual network rule.",
            )
            .param(ParamSpec::optional("virtual_network_subnet_id")),
        );
        table.add_command(vnet_rule(
            CommandKind::Delete,
            "delete",
            "Delete the virtual network rule with the given name.",
        ));
        table.add_command(vnet_rule(
            CommandKind::Show,
            "show",
            "Get a virtual network rule.",
        ));
        table.add_command(
            CommandSpec::new(
                vnet.child("list"),
                CommandKind::List,
                "Get a list of virtual network rules in a server.",
            )
            .param(resource_group())
            .param(server_name()),
        );
    }

    // server configuration
    let configuration_command = |kind, word: &str, summary| {
        CommandSpec::new(configuration.child(word), kind, summary)
            .param(resource_group())
            .param(server_name())
    };
    table.add_command(
        configuration_command(
            CommandKind::Set,
            "set",
            "Update the configuration of a server.",
        )
        .param(ParamSpec::required("configuration_name"))
        .param(ParamSpec::optional("value"))
        .param(ParamSpec::optional("source")),
    );
    table.add_command(
        configuration_command(
            CommandKind::Show,
            "show",
            "Get the configuration for a server.",
        )
        .param(ParamSpec::required("configuration_name")),
    );
    table.add_command(configuration_command(
        CommandKind::List,
        "list",
        "List the configuration values for a server.",
    ));

    // server-logs
    table.add_command(
        CommandSpec::new(
            logs.child("list"),
            CommandKind::List,
            "List log files for a server.",
        )
        .param(resource_group())
        .param(server_name())
        .param(
            ParamSpec::optional("filename_contains")
                .help("The pattern that file name should match."),
        )
        .param(
            int("file_last_written")
                .help("Integer in hours to indicate file last modify time, default value is 72."),
        )
        .param(int("max_file_size").help("The file size limitation to filter files.")),
    );
    table.add_command(
        CommandSpec::new(
            logs.child("download"),
            CommandKind::Download,
            "Download log files.",
        )
        .param(resource_group())
        .param(server_name())
        .param(ParamSpec::required("file_name").help("Space-separated list of files to download.")),
    );

    // db
    let database = |kind, word: &str, summary| {
        CommandSpec::new(db.child(word), kind, summary)
            .param(resource_group())
            .param(server_name())
    };
    table.add_command(
        database(CommandKind::Create, "create", "Create a database.")
            .param(ParamSpec::required("database_name"))
            .param(ParamSpec::optional("charset").help("The charset of the database."))
            .param(ParamSpec::optional("collation").help("The collation of the database.")),
    );
    table.add_command(
        database(CommandKind::Delete, "delete", "Delete a database.")
            .param(ParamSpec::required("database_name")),
    );
    table.add_command(
        database(CommandKind::Show, "show", "Show the details of a database.")
            .param(ParamSpec::required("database_name")),
    );
    table.add_command(database(
        CommandKind::List,
        "list",
        "List the databases for a server.",
    ));
}
