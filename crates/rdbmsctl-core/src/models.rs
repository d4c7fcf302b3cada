//! Management-API model schemas
//!
//! Each engine exposes the same four models. The only engine specific
//! detail is the set of server versions, so the schemas are generated
//! from the engine rather than written out twice.

use serde::Serialize;

use crate::engine::Engine;
use crate::settings::ValueType;

/// Complex request objects that can be expanded into flat arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ModelType {
    Sku,
    ServerPropertiesForDefaultCreate,
    ServerPropertiesForRestore,
    ServerForCreate,
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Sku => "Sku",
            ModelType::ServerPropertiesForDefaultCreate => "ServerPropertiesForDefaultCreate",
            ModelType::ServerPropertiesForRestore => "ServerPropertiesForRestore",
            ModelType::ServerForCreate => "ServerForCreate",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Argument dest used on the CLI side
    pub dest: &'static str,
    /// Property name in the request body
    pub key: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    pub help: &'static str,
}

impl FieldSpec {
    fn new(
        dest: &'static str,
        key: &'static str,
        value_type: ValueType,
        help: &'static str,
    ) -> Self {
        Self {
            dest,
            key,
            value_type,
            required: false,
            help,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A model belonging to a specific engine's namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModelRef {
    pub engine: Engine,
    pub model: ModelType,
}

impl ModelRef {
    pub fn fields(&self) -> Vec<FieldSpec> {
        ModelNamespace::new(self.engine).fields(self.model)
    }

    pub fn constants(&self) -> &'static [(&'static str, &'static str)] {
        ModelNamespace::new(self.engine).constants(self.model)
    }

    pub fn field(&self, dest: &str) -> Option<FieldSpec> {
        self.fields().into_iter().find(|field| field.dest == dest)
    }
}

/// Typed schema source for one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelNamespace {
    engine: Engine,
}

impl ModelNamespace {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Reference to one of this namespace's models
    pub fn model(&self, model: ModelType) -> ModelRef {
        ModelRef {
            engine: self.engine,
            model,
        }
    }

    pub fn sku(&self) -> ModelRef {
        self.model(ModelType::Sku)
    }

    pub fn server_properties_for_default_create(&self) -> ModelRef {
        self.model(ModelType::ServerPropertiesForDefaultCreate)
    }

    pub fn server_properties_for_restore(&self) -> ModelRef {
        self.model(ModelType::ServerPropertiesForRestore)
    }

    pub fn server_for_create(&self) -> ModelRef {
        self.model(ModelType::ServerForCreate)
    }

    /// Fields of `model`, in declaration order
    pub fn fields(&self, model: ModelType) -> Vec<FieldSpec> {
        match model {
            ModelType::Sku => vec![
                FieldSpec::new(
                    "name",
                    "name",
                    ValueType::String,
                    "The name of the sku, e.g. GP_Gen4_2.",
                ),
                FieldSpec::new(
                    "tier",
                    "tier",
                    ValueType::enumeration(["Basic", "Standard"]),
                    "The tier of the particular SKU.",
                ),
                FieldSpec::new(
                    "capacity",
                    "capacity",
                    ValueType::Int,
                    "The scale up/out capacity, representing server's compute units.",
                ),
                FieldSpec::new(
                    "size",
                    "size",
                    ValueType::String,
                    "The size code, to be interpreted by resource as appropriate.",
                ),
                FieldSpec::new(
                    "family",
                    "family",
                    ValueType::String,
                    "The family of hardware.",
                ),
            ],
            ModelType::ServerPropertiesForDefaultCreate => {
                let mut fields = self.common_properties();
                fields.push(
                    FieldSpec::new(
                        "administrator_login",
                        "administratorLogin",
                        ValueType::String,
                        "The administrator's login name of a server.",
                    )
                    .required(),
                );
                fields.push(
                    FieldSpec::new(
                        "administrator_login_password",
                        "administratorLoginPassword",
                        ValueType::String,
                        "The password of the administrator login.",
                    )
                    .required(),
                );
                fields
            }
            ModelType::ServerPropertiesForRestore => {
                let mut fields = self.common_properties();
                fields.push(
                    FieldSpec::new(
                        "source_server_id",
                        "sourceServerId",
                        ValueType::String,
                        "The source server id to restore from.",
                    )
                    .required(),
                );
                fields.push(
                    FieldSpec::new(
                        "restore_point_in_time",
                        "restorePointInTime",
                        ValueType::String,
                        "Restore point creation time (ISO8601 format).",
                    )
                    .required(),
                );
                fields
            }
            ModelType::ServerForCreate => vec![
                FieldSpec::new(
                    "sku",
                    "sku",
                    ValueType::Object {
                        model: ModelType::Sku,
                    },
                    "The SKU (pricing tier) of the server.",
                ),
                FieldSpec::new(
                    "properties",
                    "properties",
                    ValueType::Object {
                        model: ModelType::ServerPropertiesForDefaultCreate,
                    },
                    "Properties of the server.",
                )
                .required(),
                FieldSpec::new(
                    "location",
                    "location",
                    ValueType::String,
                    "The location the resource resides in.",
                )
                .required(),
                FieldSpec::new(
                    "tags",
                    "tags",
                    ValueType::Dict,
                    "Application-specific metadata in the form of key-value pairs.",
                ),
            ],
        }
    }

    /// Fixed properties the model always sends
    pub fn constants(&self, model: ModelType) -> &'static [(&'static str, &'static str)] {
        match model {
            ModelType::ServerPropertiesForDefaultCreate => &[("createMode", "Default")],
            ModelType::ServerPropertiesForRestore => &[("createMode", "PointInTimeRestore")],
            ModelType::Sku | ModelType::ServerForCreate => &[],
        }
    }

    fn common_properties(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new(
                "storage_mb",
                "storageMB",
                ValueType::Int,
                "The maximum storage allowed for a server.",
            ),
            FieldSpec::new(
                "version",
                "version",
                ValueType::enumeration(self.engine.server_versions().iter().copied()),
                "Server version.",
            ),
            FieldSpec::new(
                "ssl_enforcement",
                "sslEnforcement",
                ValueType::enumeration(["Enabled", "Disabled"]),
                "Enable ssl enforcement or not when connect to server.",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dests(fields: &[FieldSpec]) -> Vec<&'static str> {
        fields.iter().map(|field| field.dest).collect()
    }

    #[test]
    fn test_sku_fields() {
        let ns = ModelNamespace::new(Engine::MySql);
        assert_eq!(
            dests(&ns.fields(ModelType::Sku)),
            vec!["name", "tier", "capacity", "size", "family"]
        );
    }

    #[test]
    fn test_version_enum_is_engine_specific() {
        let mysql = ModelNamespace::new(Engine::MySql)
            .server_properties_for_default_create()
            .field("version")
            .unwrap();
        let postgres = ModelNamespace::new(Engine::Postgres)
            .server_properties_for_default_create()
            .field("version")
            .unwrap();
        assert_eq!(mysql.value_type, ValueType::enumeration(["5.6", "5.7"]));
        assert_eq!(postgres.value_type, ValueType::enumeration(["9.5", "9.6"]));
    }

    #[test]
    fn test_restore_properties_require_source() {
        let model = ModelNamespace::new(Engine::Postgres).server_properties_for_restore();
        assert!(model.field("source_server_id").unwrap().required);
        assert!(model.field("restore_point_in_time").unwrap().required);
        assert!(model.field("administrator_login").is_none());
        assert_eq!(model.constants(), &[("createMode", "PointInTimeRestore")]);
    }

    #[test]
    fn test_server_for_create_nests_objects() {
        let model = ModelNamespace::new(Engine::MySql).server_for_create();
        assert_eq!(
            dests(&model.fields()),
            vec!["sku", "properties", "location", "tags"]
        );
        assert_eq!(
            model.field("sku").unwrap().value_type,
            ValueType::Object {
                model: ModelType::Sku
            }
        );
    }
}
