use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

const POSTGRES: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS usuarios (
    id BIGSERIAL PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    apellido VARCHAR(255) NOT NULL,
    correo VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL,
    token VARCHAR(16) NOT NULL DEFAULT 'inactivo',
    numero_incidentes INTEGER NOT NULL DEFAULT 0,
    fecha_registro TIMESTAMPTZ NOT NULL
)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_usuarios_correo ON usuarios(correo)",
    r"
CREATE TABLE IF NOT EXISTS incidentes (
    id BIGSERIAL PRIMARY KEY,
    usuario_id BIGINT NOT NULL REFERENCES usuarios(id),
    tipo_incidente VARCHAR(255) NOT NULL,
    ubicacion VARCHAR(512) NOT NULL,
    latitud DOUBLE PRECISION NOT NULL,
    longitud DOUBLE PRECISION NOT NULL,
    hora_incidente BIGINT NOT NULL,
    tipo_vialidad VARCHAR(255) NOT NULL,
    estado VARCHAR(16) NOT NULL DEFAULT 'PENDIENTE'
        CHECK (estado IN ('PENDIENTE', 'EN_PROCESO', 'RESUELTO'))
)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_usuario ON incidentes(usuario_id)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_estado ON incidentes(estado)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_lat_lon ON incidentes(latitud, longitud)",
    r"
CREATE TABLE IF NOT EXISTS fotos_incidentes (
    id BIGSERIAL PRIMARY KEY,
    incidente_id BIGINT NOT NULL REFERENCES incidentes(id) ON DELETE CASCADE,
    url_foto VARCHAR(2048) NOT NULL,
    descripcion TEXT,
    fecha_subida BIGINT NOT NULL
)",
    "CREATE INDEX IF NOT EXISTS idx_fotos_incidente ON fotos_incidentes(incidente_id)",
];

const MYSQL: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS usuarios (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    apellido VARCHAR(255) NOT NULL,
    correo VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL,
    token VARCHAR(16) NOT NULL DEFAULT 'inactivo',
    numero_incidentes INT NOT NULL DEFAULT 0,
    fecha_registro TIMESTAMP(6) NOT NULL,
    UNIQUE KEY idx_usuarios_correo (correo)
)",
    r"
CREATE TABLE IF NOT EXISTS incidentes (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    usuario_id BIGINT NOT NULL,
    tipo_incidente VARCHAR(255) NOT NULL,
    ubicacion VARCHAR(512) NOT NULL,
    latitud DOUBLE NOT NULL,
    longitud DOUBLE NOT NULL,
    hora_incidente BIGINT NOT NULL,
    tipo_vialidad VARCHAR(255) NOT NULL,
    estado VARCHAR(16) NOT NULL DEFAULT 'PENDIENTE',
    KEY idx_incidentes_usuario (usuario_id),
    KEY idx_incidentes_estado (estado),
    KEY idx_incidentes_lat_lon (latitud, longitud),
    CONSTRAINT fk_incidentes_usuario FOREIGN KEY (usuario_id) REFERENCES usuarios(id),
    CONSTRAINT chk_incidentes_estado CHECK (estado IN ('PENDIENTE', 'EN_PROCESO', 'RESUELTO'))
)",
    r"
CREATE TABLE IF NOT EXISTS fotos_incidentes (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    incidente_id BIGINT NOT NULL,
    url_foto VARCHAR(2048) NOT NULL,
    descripcion TEXT NULL,
    fecha_subida BIGINT NOT NULL,
    KEY idx_fotos_incidente (incidente_id),
    CONSTRAINT fk_fotos_incidente FOREIGN KEY (incidente_id)
        REFERENCES incidentes(id) ON DELETE CASCADE
)",
];

const SQLITE: &[&str] = &[
    r"
CREATE TABLE IF NOT EXISTS usuarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    correo TEXT NOT NULL,
    password TEXT NOT NULL,
    token TEXT NOT NULL DEFAULT 'inactivo',
    numero_incidentes INTEGER NOT NULL DEFAULT 0,
    fecha_registro TEXT NOT NULL
)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_usuarios_correo ON usuarios(correo)",
    r"
CREATE TABLE IF NOT EXISTS incidentes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario_id INTEGER NOT NULL REFERENCES usuarios(id),
    tipo_incidente TEXT NOT NULL,
    ubicacion TEXT NOT NULL,
    latitud REAL NOT NULL,
    longitud REAL NOT NULL,
    hora_incidente INTEGER NOT NULL,
    tipo_vialidad TEXT NOT NULL,
    estado TEXT NOT NULL DEFAULT 'PENDIENTE'
        CHECK (estado IN ('PENDIENTE', 'EN_PROCESO', 'RESUELTO'))
)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_usuario ON incidentes(usuario_id)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_estado ON incidentes(estado)",
    "CREATE INDEX IF NOT EXISTS idx_incidentes_lat_lon ON incidentes(latitud, longitud)",
    r"
CREATE TABLE IF NOT EXISTS fotos_incidentes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    incidente_id INTEGER NOT NULL REFERENCES incidentes(id) ON DELETE CASCADE,
    url_foto TEXT NOT NULL,
    descripcion TEXT,
    fecha_subida INTEGER NOT NULL
)",
    "CREATE INDEX IF NOT EXISTS idx_fotos_incidente ON fotos_incidentes(incidente_id)",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let statements = match backend {
            sea_orm::DatabaseBackend::Postgres => POSTGRES,
            sea_orm::DatabaseBackend::MySql => MYSQL,
            sea_orm::DatabaseBackend::Sqlite => SQLITE,
        };

        for sql in statements {
            conn.execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for sql in [
            "DROP TABLE IF EXISTS fotos_incidentes",
            "DROP TABLE IF EXISTS incidentes",
            "DROP TABLE IF EXISTS usuarios",
        ] {
            conn.execute_unprepared(sql).await?;
        }
        Ok(())
    }
}
